mod app;
mod event;
mod tui;
mod ui;
mod watcher;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tree_rows::item::{FsEntryItem, HeaderItem, Project, ProjectItem};
use tree_rows::{Error, Result, TreeItem};

use crate::app::App;
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};
use crate::watcher::FsWatcher;

/// Terminal tree browser over the flattened lazy tree index.
#[derive(Parser, Debug)]
#[command(name = "treerows", version, about)]
struct Cli {
    /// Root path to display (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Project definition file (TOML); shown as an extra root
    #[arg(long)]
    project: Option<PathBuf>,

    /// Disable filesystem watcher (auto-refresh)
    #[arg(long)]
    no_watcher: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they don't fight the alternate screen; use
    // RUST_LOG to enable them.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = cli
        .path
        .canonicalize()
        .map_err(|_| Error::InvalidPath(format!("{} does not exist", cli.path.display())))?;

    let mut roots: Vec<Box<dyn TreeItem>> = vec![
        Box::new(HeaderItem::new("files")),
        Box::new(FsEntryItem::new(&path)?),
    ];
    if let Some(project_path) = &cli.project {
        roots.push(Box::new(ProjectItem::new(Project::load(project_path)?)));
    }

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut app = App::new(roots);
    let mut events = EventHandler::new(Duration::from_millis(16));

    let _watcher = if cli.no_watcher {
        None
    } else {
        match FsWatcher::new(&path, Duration::from_millis(watcher::DEFAULT_DEBOUNCE_MS), events.sender()) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                app.set_status(format!("watcher unavailable: {err}"));
                None
            }
        }
    };

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => app.handle_key(key),
            Event::Tick => {}
            Event::Resize(_, _) => {}
            Event::FsChange(paths) => app.handle_fs_change(&paths),
        }
        app.drain_changes();

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
