use std::any::Any;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::item::{sort_items, ItemKind, TreeItem};

/// A filesystem entry: one file or directory.
///
/// Directories list their contents fresh on every expand, directories before
/// files, then lexicographic. Listing errors resolve to an empty child set.
#[derive(Debug, Clone)]
pub struct FsEntryItem {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

impl FsEntryItem {
    /// Create an item for an existing path, probing its metadata.
    pub fn new(path: &Path) -> Result<Self> {
        let metadata = fs::symlink_metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self {
            path: path.to_path_buf(),
            name,
            is_dir: metadata.is_dir(),
        })
    }

    /// Create an item from already-known parts, without touching the
    /// filesystem.
    pub fn from_parts(path: PathBuf, name: String, is_dir: bool) -> Self {
        Self { path, name, is_dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

impl TreeItem for FsEntryItem {
    fn display_text(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> ItemKind {
        ItemKind::File
    }

    fn has_children(&self) -> bool {
        self.is_dir
    }

    fn children(&mut self) -> Vec<Box<dyn TreeItem>> {
        let entries = match fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to list directory");
                return Vec::new();
            }
        };

        let mut items: Vec<Box<dyn TreeItem>> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let name = entry.file_name().to_string_lossy().to_string();
            items.push(Box::new(FsEntryItem::from_parts(entry.path(), name, is_dir)));
        }

        sort_items(&mut items);
        items
    }

    fn on_selected(&mut self) {
        tracing::debug!(path = %self.path.display(), "selected");
    }

    fn on_visibility_changed(&mut self, visible: bool) {
        tracing::trace!(name = %self.name, visible, "visibility changed");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
