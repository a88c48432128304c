use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;

use crate::event::Event;

/// Directory names whose subtrees never trigger a refresh.
const IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    ".venv",
    "target",
];

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// If more paths than this arrive in one debounce window, collapse them into
/// a single root refresh.
const FLOOD_THRESHOLD: usize = 100;

/// Filesystem watcher that monitors a root directory and emits debounced
/// change events into the app's event channel.
pub struct FsWatcher {
    /// Dropped to stop watching.
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl FsWatcher {
    /// Watch `root` recursively; changed paths are debounced by
    /// `debounce_duration` and delivered as [`Event::FsChange`].
    pub fn new(
        root: &Path,
        debounce_duration: Duration,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let root_path = root.to_path_buf();

        let mut debouncer = new_debouncer(
            debounce_duration,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                match result {
                    Ok(events) => {
                        let paths: Vec<PathBuf> = events
                            .iter()
                            .filter(|e| e.kind == DebouncedEventKind::Any)
                            .map(|e| e.path.clone())
                            .filter(|p| !should_ignore(p))
                            .collect();

                        if paths.is_empty() {
                            return;
                        }

                        let final_paths = if paths.len() > FLOOD_THRESHOLD {
                            vec![root_path.clone()]
                        } else {
                            paths
                        };

                        let _ = event_tx.send(Event::FsChange(final_paths));
                    }
                    Err(err) => {
                        tracing::warn!(%err, "watcher error");
                    }
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(root, notify::RecursiveMode::Recursive)?;

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// A path is ignored when any of its components matches an ignored
/// directory name exactly.
fn should_ignore(path: &Path) -> bool {
    path.components().any(|component| {
        matches!(
            component,
            std::path::Component::Normal(name)
                if IGNORED_DIRS.contains(&name.to_string_lossy().as_ref())
        )
    })
}
