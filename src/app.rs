use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use tree_rows::item::FsEntryItem;
use tree_rows::{NodeId, RowChange, TreeIndex, TreeItem};

/// Demo application state: the tree index, cursor/scroll, and the map of
/// plain directory rows used to target watcher-driven reconciliation.
pub struct App {
    pub index: TreeIndex,
    pub selected: usize,
    pub scroll: usize,
    pub status: String,
    pub should_quit: bool,
    changes: mpsc::UnboundedReceiver<RowChange>,
    /// Visible plain-filesystem directory rows, by path. Project folder
    /// rows are excluded: their listings are pattern-filtered, so a naive
    /// directory diff would reinsert filtered entries.
    dir_nodes: HashMap<PathBuf, NodeId>,
}

impl App {
    pub fn new(roots: Vec<Box<dyn TreeItem>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let index = TreeIndex::new(roots, Box::new(tx));
        let mut app = Self {
            index,
            selected: 0,
            scroll: 0,
            status: String::new(),
            should_quit: false,
            changes: rx,
            dir_nodes: HashMap::new(),
        };
        app.reindex_dirs();
        app
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.index.row_count() {
                    self.selected += 1;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => self.index.expand(self.selected),
            KeyCode::Left | KeyCode::Char('h') => self.collapse_or_jump_to_parent(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_or_select(),
            _ => {}
        }
        self.clamp_selection();
    }

    fn toggle_or_select(&mut self) {
        if self.index.row_count() == 0 {
            return;
        }
        let row = self.index.row_at(self.selected);
        if !row.has_children {
            self.index.select(self.selected);
        } else if row.expanded {
            self.index.collapse(self.selected);
        } else {
            self.index.expand(self.selected);
        }
    }

    /// Collapse the selected row, or move the cursor to its parent row when
    /// it is already collapsed.
    fn collapse_or_jump_to_parent(&mut self) {
        if self.index.row_count() == 0 {
            return;
        }
        let row = self.index.row_at(self.selected);
        if row.expanded {
            self.index.collapse(self.selected);
            return;
        }
        let indent = row.indent;
        if indent == 0 {
            return;
        }
        for candidate in (0..self.selected).rev() {
            if self.index.row_at(candidate).indent < indent {
                self.selected = candidate;
                return;
            }
        }
    }

    /// Apply debounced watcher events: for every changed path, reconcile the
    /// nearest tracked directory node against the live listing with
    /// single-child splices.
    ///
    /// A path naming a tracked directory that still exists reconciles the
    /// whole tracked subtree below it; the watcher collapses event floods
    /// into a single watch-root path, which carries no detail about which
    /// nested directories changed. A path that no longer exists as a
    /// directory (deleted, or a plain file) reconciles its parent instead.
    pub fn handle_fs_change(&mut self, paths: &[PathBuf]) {
        for path in paths {
            if self.dir_nodes.contains_key(path) && path.is_dir() {
                self.reconcile_subtree(path);
                continue;
            }
            let Some(parent) = path.parent() else {
                continue;
            };
            if let Some(&id) = self.dir_nodes.get(parent) {
                self.reconcile_dir(parent, id);
            }
        }
        self.clamp_selection();
    }

    /// Drain row-change notifications emitted since the last event loop
    /// turn; any structural change invalidates the directory row map.
    pub fn drain_changes(&mut self) {
        let mut dirty = false;
        while let Ok(change) = self.changes.try_recv() {
            match change {
                RowChange::Inserted { first, last } => {
                    self.status = format!("{} row(s) inserted at {first}", last - first + 1);
                    dirty = true;
                }
                RowChange::Removed { first, last } => {
                    self.status = format!("{} row(s) removed at {first}", last - first + 1);
                    dirty = true;
                }
                RowChange::AboutToInsert { .. } | RowChange::AboutToRemove { .. } => {}
            }
        }
        if dirty {
            self.reindex_dirs();
            self.clamp_selection();
        }
    }

    /// Keep the selected row visible in a viewport of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + visible_height {
            self.scroll = self.selected - visible_height + 1;
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.index.row_count();
        if count > 0 && self.selected >= count {
            self.selected = count - 1;
        }
    }

    fn reindex_dirs(&mut self) {
        self.dir_nodes.clear();
        for row in 0..self.index.row_count() {
            let r = self.index.row_at(row);
            if let Some(entry) = r.item.as_any().downcast_ref::<FsEntryItem>() {
                if entry.is_dir() {
                    self.dir_nodes.insert(entry.path().to_path_buf(), r.id);
                }
            }
        }
    }

    /// Reconcile every tracked directory at or below `root`, parents before
    /// children. Reconciling a parent can remove a child directory's subtree;
    /// the child's handle goes stale and its own reconcile no-ops.
    fn reconcile_subtree(&mut self, root: &Path) {
        let mut dirs: Vec<(PathBuf, NodeId)> = self
            .dir_nodes
            .iter()
            .filter(|(path, _)| path.starts_with(root))
            .map(|(path, &id)| (path.clone(), id))
            .collect();
        dirs.sort_by(|a, b| a.0.cmp(&b.0));
        for (dir, id) in dirs {
            self.reconcile_dir(&dir, id);
        }
    }

    /// Bring an expanded directory node's materialized children in line with
    /// the live directory listing, one insert/remove splice per difference.
    fn reconcile_dir(&mut self, dir: &Path, id: NodeId) {
        if !self.index.is_expanded(id) {
            return;
        }

        let target = match list_dir_sorted(dir) {
            Some(target) => target,
            None => return,
        };

        // Snapshot the materialized children's sort keys before mutating.
        let mut current: Vec<(bool, String)> = self
            .index
            .direct_children_of(id)
            .iter()
            .filter_map(|child| self.index.item(*child))
            .map(|item| (item.has_children(), item.display_text()))
            .collect();

        let mut at = 0;
        for (is_dir, name, path) in target {
            let key = sort_key(is_dir, &name);
            while at < current.len() && sort_key(current[at].0, &current[at].1) < key {
                self.index.remove_child(id, at);
                current.remove(at);
            }
            if at < current.len() && sort_key(current[at].0, &current[at].1) == key {
                at += 1;
            } else {
                self.index.insert_child(
                    id,
                    Box::new(FsEntryItem::from_parts(path, name.clone(), is_dir)),
                    at,
                );
                current.insert(at, (is_dir, name));
                at += 1;
            }
        }
        while at < current.len() {
            self.index.remove_child(id, at);
            current.remove(at);
        }
    }
}

/// Merge key matching the order `FsEntryItem::children` produces:
/// directories first, then case-insensitive name, raw name as tiebreak.
fn sort_key(is_dir: bool, name: &str) -> (bool, String, String) {
    (!is_dir, name.to_lowercase(), name.to_string())
}

/// List a directory in the same order `FsEntryItem::children` uses, or
/// `None` when it cannot be read (e.g. it was just deleted).
fn list_dir_sorted(dir: &Path) -> Option<Vec<(bool, String, PathBuf)>> {
    let entries = fs::read_dir(dir).ok()?;
    let mut listing: Vec<(bool, String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let name = entry.file_name().to_string_lossy().to_string();
            (is_dir, name, entry.path())
        })
        .collect();
    listing.sort_by_key(|(is_dir, name, _)| sort_key(*is_dir, name));
    Some(listing)
}
