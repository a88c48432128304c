//! The tree item abstraction consumed by the index engine.
//!
//! An item is the data source for one row: its label, whether it can be
//! expanded, and (computed fresh on every expand) its children. Concrete
//! variants implement only what they need; the trait supplies no-op defaults
//! for everything except `display_text` and `on_selected`.

mod fs_entry;
mod header;
mod project;

use std::any::Any;

pub use fs_entry::FsEntryItem;
pub use header::{HeaderItem, LeafItem};
pub use project::{Project, ProjectFolder, ProjectFolderItem, ProjectItem};

/// Rendering hint for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Generic item, no particular styling.
    Item,
    /// Filesystem entry (file or directory).
    File,
    /// Section header.
    Header,
    /// Project root.
    Project,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Item => "item",
            ItemKind::File => "file",
            ItemKind::Header => "header",
            ItemKind::Project => "project",
        }
    }
}

/// Capability set for one row of the tree.
///
/// `children()` is only called when the item's row is expanded, is re-invoked
/// on every expand (items do not cache), and must return a deterministic
/// order. It may block on I/O; listings are assumed small.
pub trait TreeItem {
    /// The text to display for this row.
    fn display_text(&self) -> String;

    /// Called when the user selects the row.
    fn on_selected(&mut self);

    /// Rendering hint, e.g. file vs. header.
    fn kind(&self) -> ItemKind {
        ItemKind::Item
    }

    fn icon(&self) -> Option<&str> {
        None
    }

    /// Whether an expand affordance should be shown.
    fn has_children(&self) -> bool {
        false
    }

    /// Whether the index should expand this item immediately when it is
    /// materialized as a root at construction. Expansion is otherwise always
    /// explicit.
    fn starts_expanded(&self) -> bool {
        false
    }

    /// Produce this item's children. Only called when expanding.
    fn children(&mut self) -> Vec<Box<dyn TreeItem>> {
        Vec::new()
    }

    /// Called when the item's row enters (true) or leaves (false) the
    /// visible tree.
    fn on_visibility_changed(&mut self, _visible: bool) {}

    /// Called when the item is expanded or collapsed. Can be used to add or
    /// remove watchers for its children.
    fn on_expansion_changed(&mut self, _expanded: bool) {}

    /// Concrete-type recovery for consumers that need more than the row
    /// capabilities (e.g. a file path).
    fn as_any(&self) -> &dyn Any;
}

/// Sort items in place: expandable items first, then by display text
/// (case-insensitive, raw text as tiebreak).
pub fn sort_items(items: &mut [Box<dyn TreeItem>]) {
    items.sort_by(|a, b| {
        b.has_children()
            .cmp(&a.has_children())
            .then_with(|| {
                a.display_text()
                    .to_lowercase()
                    .cmp(&b.display_text().to_lowercase())
            })
            .then_with(|| a.display_text().cmp(&b.display_text()))
    });
}
