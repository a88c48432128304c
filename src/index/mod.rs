//! The tree index engine: a flat, pre-order row sequence over a forest of
//! lazily expanded nodes.
//!
//! Invariant (pre-order width): every node's materialized children
//! immediately follow it in the sequence, and its subtree occupies exactly
//! `1 + descendants` consecutive slots starting at its own row. Every
//! operation here preserves that invariant; locating a node never walks the
//! whole sequence, it skips sibling subtrees by their width.
//!
//! Failure semantics: passing a row the index did not produce (out of range)
//! or holding handles across a broken invariant is a programmer error and
//! panics. I/O problems inside an item's `children()` never surface here;
//! items resolve them to an empty listing themselves.

mod arena;
mod change;

use arena::{Node, NodeArena};

pub use arena::NodeId;
pub use change::{ChangeSink, NullSink, RowChange};

use crate::item::TreeItem;

/// A view of one row: the item plus its position metadata.
pub struct Row<'a> {
    pub id: NodeId,
    pub item: &'a dyn TreeItem,
    pub indent: usize,
    pub expanded: bool,
    pub has_children: bool,
}

/// Flattened lazy tree index.
///
/// Not internally synchronized; the caller serializes all mutation onto one
/// thread (typically by funneling UI and watcher events through one event
/// loop).
pub struct TreeIndex {
    arena: NodeArena,
    rows: Vec<NodeId>,
    sink: Box<dyn ChangeSink>,
}

impl TreeIndex {
    /// Build an index over a forest of root items, each wrapped as an
    /// indent-0 node. Roots are not expanded eagerly unless the item asks for
    /// it via `starts_expanded()`. Construction emits no change
    /// notifications; the sink only sees mutations made after the view binds.
    pub fn new(root_items: Vec<Box<dyn TreeItem>>, sink: Box<dyn ChangeSink>) -> Self {
        let mut index = Self {
            arena: NodeArena::new(),
            rows: Vec::new(),
            sink: Box::new(NullSink),
        };

        for item in root_items {
            let id = index.arena.alloc(Node {
                item,
                indent: 0,
                expanded: false,
                parent: None,
                direct_children: 0,
                descendants: 0,
            });
            index.rows.push(id);
            index.node_mut(id).item.on_visibility_changed(true);
        }

        // Expanding shifts later rows, so walk by subtree width.
        let mut row = 0;
        while row < index.rows.len() {
            let id = index.rows[row];
            let wants_expand = {
                let node = index.node(id);
                node.item.starts_expanded() && node.item.has_children()
            };
            if wants_expand {
                index.expand(row);
            }
            row += 1 + index.node(id).descendants;
        }

        index.sink = sink;
        index
    }

    /// Length of the flat sequence. O(1).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of live nodes in the arena. Always equals `row_count()`;
    /// nodes are freed the moment they leave the sequence.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Look up the row at an absolute index.
    ///
    /// Panics when `row >= row_count()`: callers must only pass indices the
    /// index itself produced.
    pub fn row_at(&self, row: usize) -> Row<'_> {
        let id = self.id_at(row);
        let node = self.node(id);
        Row {
            id,
            item: node.item.as_ref(),
            indent: node.indent,
            expanded: node.expanded,
            has_children: node.item.has_children(),
        }
    }

    /// Expand the node at `row`: materialize its children right after it.
    ///
    /// No-op if the item has no children or the node is already expanded.
    /// Calls the item's `children()` synchronously; this may block on I/O.
    pub fn expand(&mut self, row: usize) {
        let id = self.id_at(row);
        {
            let node = self.node(id);
            if node.expanded || !node.item.has_children() {
                return;
            }
        }

        let (children, indent) = {
            let node = self.node_mut(id);
            node.expanded = true;
            node.item.on_expansion_changed(true);
            (node.item.children(), node.indent)
        };

        let ids: Vec<NodeId> = children
            .into_iter()
            .map(|item| {
                self.arena.alloc(Node {
                    item,
                    indent: indent + 1,
                    expanded: false,
                    parent: Some(id),
                    direct_children: 0,
                    descendants: 0,
                })
            })
            .collect();

        self.insert_nodes(ids, row + 1, id);
    }

    /// Collapse the node at `row`, removing its whole materialized subtree.
    /// No-op if not expanded.
    pub fn collapse(&mut self, row: usize) {
        let id = self.id_at(row);
        let (count, direct) = {
            let node = self.node_mut(id);
            if !node.expanded {
                return;
            }
            node.expanded = false;
            node.item.on_expansion_changed(false);
            (node.descendants, node.direct_children)
        };
        self.remove_nodes(row + 1, count, id, direct);
    }

    /// Insert one new child at a logical position among `parent`'s current
    /// children. Entry point for items whose backing data changed out of
    /// band. No-op if the handle is stale or the parent is not expanded
    /// (children aren't materialized, there is nothing to splice into).
    ///
    /// Panics if `child_index` exceeds the parent's direct-child count.
    pub fn insert_child(&mut self, parent: NodeId, item: Box<dyn TreeItem>, child_index: usize) {
        let Some(node) = self.arena.get(parent) else {
            return;
        };
        if !node.expanded {
            return;
        }
        assert!(
            child_index <= node.direct_children,
            "child index {child_index} out of range for parent with {} children",
            node.direct_children
        );
        let indent = node.indent;

        let at = self.child_offset(parent, child_index);
        let id = self.arena.alloc(Node {
            item,
            indent: indent + 1,
            expanded: false,
            parent: Some(parent),
            direct_children: 0,
            descendants: 0,
        });
        self.insert_nodes(vec![id], at, parent);
    }

    /// Remove exactly one child subtree at a logical position among
    /// `parent`'s current children. No-op if the handle is stale or the
    /// parent is not expanded.
    ///
    /// Panics if `child_index` is not a current child: silently removing the
    /// wrong row would corrupt the sequence.
    pub fn remove_child(&mut self, parent: NodeId, child_index: usize) {
        let Some(node) = self.arena.get(parent) else {
            return;
        };
        if !node.expanded {
            return;
        }
        assert!(
            child_index < node.direct_children,
            "child index {child_index} >= parent's {} children",
            node.direct_children
        );

        let at = self.child_offset(parent, child_index);
        let count = 1 + self.node(self.rows[at]).descendants;
        self.remove_nodes(at, count, parent, 1);
    }

    /// Absolute row of a node, or `None` if the handle is stale (the item has
    /// no node anymore) or the node cannot be reached from its parent.
    ///
    /// Panics if the sequence contradicts itself while scanning (an ancestor
    /// of a live node is collapsed, or a scanned entry has the wrong parent):
    /// that is a broken invariant, not a "not found".
    pub fn find_row(&self, id: NodeId) -> Option<usize> {
        if self.arena.get(id).is_none() {
            return None;
        }
        self.locate(id)
    }

    /// Forward a click on `row` to the item.
    pub fn select(&mut self, row: usize) {
        let id = self.id_at(row);
        self.node_mut(id).item.on_selected();
    }

    /// Whether the node behind `id` is currently expanded. Stale handles
    /// read as not expanded.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.arena.get(id).map(|n| n.expanded).unwrap_or(false)
    }

    /// The item behind a handle, if the node is still live.
    pub fn item(&self, id: NodeId) -> Option<&dyn TreeItem> {
        self.arena.get(id).map(|n| n.item.as_ref())
    }

    /// Materialized descendant count of a node.
    pub fn descendant_count(&self, id: NodeId) -> Option<usize> {
        self.arena.get(id).map(|n| n.descendants)
    }

    /// Handles of a node's materialized immediate children, in row order.
    /// Empty for stale handles and collapsed nodes.
    pub fn direct_children_of(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.arena.get(id) else {
            return Vec::new();
        };
        if !node.expanded {
            return Vec::new();
        }
        let Some(row) = self.locate(id) else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(node.direct_children);
        let mut at = row + 1;
        for _ in 0..node.direct_children {
            let child = self.rows[at];
            out.push(child);
            at += 1 + self.node(child).descendants;
        }
        out
    }

    // ── internals ────────────────────────────────────────────────────────

    fn id_at(&self, row: usize) -> NodeId {
        assert!(
            row < self.rows.len(),
            "row {row} out of range (0..{})",
            self.rows.len()
        );
        self.rows[row]
    }

    fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id).expect("stale node handle in flat sequence")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.arena
            .get_mut(id)
            .expect("stale node handle in flat sequence")
    }

    /// Recursive locate: resolve the parent's row first, then scan forward
    /// from the first child slot, skipping each sibling's subtree width.
    /// Relies on the pre-order invariant (siblings of a common parent are
    /// consecutive, each immediately followed by its own subtree).
    fn locate(&self, id: NodeId) -> Option<usize> {
        let target = self.node(id);
        let mut row = match target.parent {
            Some(parent) => {
                let parent_row = self.locate(parent)?;
                assert!(
                    self.node(self.rows[parent_row]).expanded,
                    "ancestor of a live node is collapsed"
                );
                parent_row + 1
            }
            None => 0,
        };

        loop {
            if row >= self.rows.len() {
                return None;
            }
            let current = self.rows[row];
            let current_node = self.node(current);
            assert!(
                current_node.parent == target.parent,
                "flat sequence is out of pre-order"
            );
            if current == id {
                return Some(row);
            }
            row += 1 + current_node.descendants;
        }
    }

    /// Resolve a logical child index under `parent` to an absolute row by
    /// skipping preceding siblings' subtree widths.
    fn child_offset(&self, parent: NodeId, child_index: usize) -> usize {
        let row = self
            .locate(parent)
            .expect("expanded parent is not in the flat sequence");
        let mut at = row + 1;
        for _ in 0..child_index {
            at += 1 + self.node(self.rows[at]).descendants;
        }
        at
    }

    /// Splice `ids` into the sequence at `at` as direct children of
    /// `parent`, updating counts and bracketing the mutation with
    /// notifications.
    fn insert_nodes(&mut self, ids: Vec<NodeId>, at: usize, parent: NodeId) {
        let count = ids.len();
        if count == 0 {
            return;
        }

        self.node_mut(parent).direct_children += count;
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            let node = self.node_mut(id);
            node.descendants += count;
            cursor = node.parent;
        }

        self.sink.on_rows_changed(RowChange::AboutToInsert {
            first: at,
            last: at + count - 1,
        });
        self.rows.splice(at..at, ids.iter().copied());
        self.sink.on_rows_changed(RowChange::Inserted {
            first: at,
            last: at + count - 1,
        });

        for id in ids {
            self.node_mut(id).item.on_visibility_changed(true);
        }
    }

    /// Remove `count` consecutive rows starting at `at`, all inside
    /// `parent`'s subtree, of which `direct_removed` are its direct
    /// children. Removed nodes are freed; their handles go stale.
    fn remove_nodes(&mut self, at: usize, count: usize, parent: NodeId, direct_removed: usize) {
        if count == 0 {
            return;
        }

        self.node_mut(parent).direct_children -= direct_removed;
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            let node = self.node_mut(id);
            node.descendants -= count;
            cursor = node.parent;
        }

        self.sink.on_rows_changed(RowChange::AboutToRemove {
            first: at,
            last: at + count - 1,
        });
        let removed: Vec<NodeId> = self.rows.drain(at..at + count).collect();
        self.sink.on_rows_changed(RowChange::Removed {
            first: at,
            last: at + count - 1,
        });

        for id in removed {
            if let Some(mut node) = self.arena.free(id) {
                node.item.on_visibility_changed(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Static test tree: children are cloned fresh on every expand, like a
    /// real lazy item re-listing its backing data.
    #[derive(Clone)]
    struct Branch {
        label: String,
        kids: Vec<Branch>,
        auto_expand: bool,
        clicks: Rc<RefCell<usize>>,
        visibility_log: Rc<RefCell<Vec<(String, bool)>>>,
    }

    fn leaf(label: &str) -> Branch {
        branch(label, vec![])
    }

    fn branch(label: &str, kids: Vec<Branch>) -> Branch {
        Branch {
            label: label.into(),
            kids,
            auto_expand: false,
            clicks: Rc::new(RefCell::new(0)),
            visibility_log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    impl TreeItem for Branch {
        fn display_text(&self) -> String {
            self.label.clone()
        }

        fn has_children(&self) -> bool {
            !self.kids.is_empty()
        }

        fn starts_expanded(&self) -> bool {
            self.auto_expand
        }

        fn children(&mut self) -> Vec<Box<dyn TreeItem>> {
            self.kids
                .iter()
                .cloned()
                .map(|k| Box::new(k) as Box<dyn TreeItem>)
                .collect()
        }

        fn on_selected(&mut self) {
            *self.clicks.borrow_mut() += 1;
        }

        fn on_visibility_changed(&mut self, visible: bool) {
            self.visibility_log
                .borrow_mut()
                .push((self.label.clone(), visible));
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    struct Recorder(Rc<RefCell<Vec<RowChange>>>);

    impl ChangeSink for Recorder {
        fn on_rows_changed(&mut self, change: RowChange) {
            self.0.borrow_mut().push(change);
        }
    }

    fn index_of(roots: Vec<Branch>) -> TreeIndex {
        let items: Vec<Box<dyn TreeItem>> = roots
            .into_iter()
            .map(|r| Box::new(r) as Box<dyn TreeItem>)
            .collect();
        TreeIndex::new(items, Box::new(NullSink))
    }

    fn labels(index: &TreeIndex) -> Vec<(String, usize)> {
        (0..index.row_count())
            .map(|row| {
                let r = index.row_at(row);
                (r.item.display_text(), r.indent)
            })
            .collect()
    }

    /// Check the pre-order width invariant: each node's recorded descendant
    /// count equals the number of following rows with a strictly larger
    /// indent, up to the next row at its own indent or less.
    fn assert_preorder_widths(index: &TreeIndex) {
        for row in 0..index.row_count() {
            let r = index.row_at(row);
            let mut width = 0;
            for next in row + 1..index.row_count() {
                if index.row_at(next).indent <= r.indent {
                    break;
                }
                width += 1;
            }
            assert_eq!(
                index.descendant_count(r.id),
                Some(width),
                "descendant count of {:?} disagrees with the sequence",
                r.item.display_text()
            );
        }
    }

    fn two_roots() -> Vec<Branch> {
        vec![
            branch("a", vec![leaf("a1"), branch("a2", vec![leaf("a2x"), leaf("a2y")]), leaf("a3")]),
            leaf("b"),
        ]
    }

    #[test]
    fn construction_does_not_expand_roots() {
        let index = index_of(two_roots());
        assert_eq!(index.row_count(), 2);
        assert_eq!(
            labels(&index),
            vec![("a".to_string(), 0), ("b".to_string(), 0)]
        );
        assert_preorder_widths(&index);
    }

    #[test]
    fn auto_expanded_root() {
        let mut root = branch("a", vec![leaf("a1"), leaf("a2")]);
        root.auto_expand = true;
        let index = index_of(vec![root, leaf("b")]);
        assert_eq!(
            labels(&index),
            vec![
                ("a".to_string(), 0),
                ("a1".to_string(), 1),
                ("a2".to_string(), 1),
                ("b".to_string(), 0),
            ]
        );
        assert_preorder_widths(&index);
    }

    #[test]
    fn expand_inserts_children_after_the_row() {
        let mut index = index_of(two_roots());
        index.expand(0);
        assert_eq!(
            labels(&index),
            vec![
                ("a".to_string(), 0),
                ("a1".to_string(), 1),
                ("a2".to_string(), 1),
                ("a3".to_string(), 1),
                ("b".to_string(), 0),
            ]
        );
        assert!(index.row_at(0).expanded);
        assert_preorder_widths(&index);
    }

    #[test]
    fn expand_is_idempotent() {
        let mut index = index_of(two_roots());
        index.expand(0);
        let before = labels(&index);
        index.expand(0);
        assert_eq!(labels(&index), before);
        assert_preorder_widths(&index);
    }

    #[test]
    fn expand_leaf_is_a_noop() {
        let mut index = index_of(two_roots());
        index.expand(1);
        assert_eq!(index.row_count(), 2);
        assert!(!index.row_at(1).expanded);
    }

    #[test]
    fn expand_collapse_round_trip() {
        let mut index = index_of(two_roots());
        let before = labels(&index);
        index.expand(0);
        index.collapse(0);
        assert_eq!(labels(&index), before);
        assert!(!index.row_at(0).expanded);
        assert_preorder_widths(&index);
    }

    #[test]
    fn collapse_when_not_expanded_is_a_noop() {
        let mut index = index_of(two_roots());
        index.collapse(0);
        assert_eq!(index.row_count(), 2);
    }

    // Nested expansion: expanding a child splices inside the parent's
    // subtree, and collapsing the parent removes every descendant row.
    #[test]
    fn nested_expand_and_collapse_all() {
        let mut index = index_of(two_roots());
        index.expand(0);
        assert_eq!(index.row_count(), 5);

        // "a2" sits at row 2 and has two children of its own.
        index.expand(2);
        assert_eq!(index.row_count(), 7);
        assert_eq!(index.row_at(3).item.display_text(), "a2x");
        assert_eq!(index.row_at(4).item.display_text(), "a2y");
        assert_eq!(index.descendant_count(index.row_at(0).id), Some(5));
        assert_preorder_widths(&index);

        index.collapse(0);
        assert_eq!(index.row_count(), 2);
        assert_preorder_widths(&index);
    }

    #[test]
    fn expand_with_no_children_marks_expanded_without_rows() {
        // has_children true but the listing comes back empty, as with an
        // empty directory.
        struct EmptyDir;
        impl TreeItem for EmptyDir {
            fn display_text(&self) -> String {
                "dir".into()
            }
            fn has_children(&self) -> bool {
                true
            }
            fn on_selected(&mut self) {}
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        let mut index = TreeIndex::new(vec![Box::new(EmptyDir)], Box::new(NullSink));
        index.expand(0);
        assert_eq!(index.row_count(), 1);
        assert!(index.row_at(0).expanded);
        index.collapse(0);
        assert!(!index.row_at(0).expanded);
    }

    #[test]
    fn insert_child_updates_ancestor_counts() {
        let mut index = index_of(two_roots());
        index.expand(0);
        index.expand(2); // a2
        let root = index.row_at(0).id;
        let parent = index.row_at(2).id;

        index.insert_child(parent, Box::new(leaf("a2new")), 1);
        assert_eq!(
            labels(&index),
            vec![
                ("a".to_string(), 0),
                ("a1".to_string(), 1),
                ("a2".to_string(), 1),
                ("a2x".to_string(), 2),
                ("a2new".to_string(), 2),
                ("a2y".to_string(), 2),
                ("a3".to_string(), 1),
                ("b".to_string(), 0),
            ]
        );
        assert_eq!(index.descendant_count(parent), Some(3));
        assert_eq!(index.descendant_count(root), Some(6));
        assert_preorder_widths(&index);
    }

    #[test]
    fn insert_child_appends_at_child_count() {
        let mut index = index_of(two_roots());
        index.expand(0);
        let parent = index.row_at(0).id;
        index.insert_child(parent, Box::new(leaf("a4")), 3);
        assert_eq!(index.row_at(4).item.display_text(), "a4");
        assert_preorder_widths(&index);
    }

    #[test]
    fn insert_child_on_collapsed_parent_is_a_noop() {
        let mut index = index_of(two_roots());
        let parent = index.row_at(0).id;
        index.insert_child(parent, Box::new(leaf("new")), 0);
        assert_eq!(index.row_count(), 2);
    }

    #[test]
    fn insert_child_with_stale_handle_is_a_noop() {
        let mut index = index_of(two_roots());
        index.expand(0);
        index.expand(2);
        let parent = index.row_at(2).id; // a2
        index.collapse(0); // frees a2's node
        index.insert_child(parent, Box::new(leaf("new")), 0);
        assert_eq!(index.row_count(), 2);
    }

    #[test]
    #[should_panic(expected = "child index")]
    fn insert_child_past_child_count_panics() {
        let mut index = index_of(two_roots());
        index.expand(0);
        let parent = index.row_at(0).id;
        index.insert_child(parent, Box::new(leaf("new")), 4);
    }

    #[test]
    fn remove_child_removes_the_whole_subtree() {
        let mut index = index_of(two_roots());
        index.expand(0);
        index.expand(2); // a2, now with two children
        let root = index.row_at(0).id;

        index.remove_child(root, 1);
        assert_eq!(
            labels(&index),
            vec![
                ("a".to_string(), 0),
                ("a1".to_string(), 1),
                ("a3".to_string(), 1),
                ("b".to_string(), 0),
            ]
        );
        assert_eq!(index.descendant_count(root), Some(2));
        assert_preorder_widths(&index);
    }

    #[test]
    #[should_panic(expected = "child index")]
    fn remove_child_out_of_bounds_panics() {
        let mut index = index_of(two_roots());
        index.expand(0);
        let parent = index.row_at(0).id;
        index.remove_child(parent, 5);
    }

    #[test]
    fn remove_child_on_collapsed_parent_is_a_noop() {
        let mut index = index_of(two_roots());
        let parent = index.row_at(0).id;
        index.remove_child(parent, 0);
        assert_eq!(index.row_count(), 2);
    }

    #[test]
    fn find_row_locates_roots_and_descendants() {
        let mut index = index_of(two_roots());
        index.expand(0);
        index.expand(2);

        assert_eq!(index.find_row(index.row_at(0).id), Some(0));
        assert_eq!(index.find_row(index.row_at(4).id), Some(4)); // a2y
        assert_eq!(index.find_row(index.row_at(6).id), Some(6)); // b
    }

    #[test]
    fn find_row_on_stale_handle_is_none() {
        let mut index = index_of(two_roots());
        index.expand(0);
        let child = index.row_at(1).id;
        index.collapse(0);
        assert_eq!(index.find_row(child), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn row_at_out_of_range_panics() {
        let index = index_of(two_roots());
        index.row_at(2);
    }

    #[test]
    fn select_reaches_the_item() {
        let root = leaf("a");
        let clicks = root.clicks.clone();
        let mut index = index_of(vec![root]);
        index.select(0);
        index.select(0);
        assert_eq!(*clicks.borrow(), 2);
    }

    #[test]
    fn visibility_callbacks_bracket_the_lifecycle() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut root = branch("a", vec![leaf("a1")]);
        root.visibility_log = log.clone();
        root.kids[0].visibility_log = log.clone();
        let mut index = index_of(vec![root]);
        assert_eq!(log.borrow().as_slice(), &[("a".to_string(), true)]);

        index.expand(0);
        index.collapse(0);
        // The clone handed out by children() shares the log handle.
        assert_eq!(
            log.borrow().as_slice(),
            &[
                ("a".to_string(), true),
                ("a1".to_string(), true),
                ("a1".to_string(), false),
            ]
        );
    }

    #[test]
    fn notifications_bracket_mutations_with_exact_ranges() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let items: Vec<Box<dyn TreeItem>> = vec![Box::new(branch(
            "a",
            vec![leaf("a1"), leaf("a2"), leaf("a3")],
        ))];
        let mut index = TreeIndex::new(items, Box::new(Recorder(log.clone())));
        assert!(log.borrow().is_empty(), "construction must be silent");

        index.expand(0);
        assert_eq!(
            log.borrow().as_slice(),
            &[
                RowChange::AboutToInsert { first: 1, last: 3 },
                RowChange::Inserted { first: 1, last: 3 },
            ]
        );

        log.borrow_mut().clear();
        index.collapse(0);
        assert_eq!(
            log.borrow().as_slice(),
            &[
                RowChange::AboutToRemove { first: 1, last: 3 },
                RowChange::Removed { first: 1, last: 3 },
            ]
        );
    }

    #[test]
    fn direct_children_of_skips_grandchildren() {
        let mut index = index_of(two_roots());
        index.expand(0);
        index.expand(2);
        let root = index.row_at(0).id;
        let children = index.direct_children_of(root);
        let names: Vec<String> = children
            .iter()
            .map(|id| index.item(*id).unwrap().display_text())
            .collect();
        assert_eq!(names, vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn direct_children_of_collapsed_node_is_empty() {
        let index = index_of(two_roots());
        let root = index.row_at(0).id;
        assert!(index.direct_children_of(root).is_empty());
    }

    // Interleave every mutation kind and re-check the width invariant.
    #[test]
    fn invariant_survives_mixed_operation_sequences() {
        let mut index = index_of(two_roots());
        index.expand(0);
        assert_preorder_widths(&index);
        index.expand(2);
        assert_preorder_widths(&index);

        let a2 = index.row_at(2).id;
        index.insert_child(a2, Box::new(branch("mid", vec![leaf("deep")])), 1);
        assert_preorder_widths(&index);

        let mid_row = index.find_row(index.direct_children_of(a2)[1]).unwrap();
        index.expand(mid_row);
        assert_preorder_widths(&index);

        index.remove_child(a2, 0);
        assert_preorder_widths(&index);

        index.collapse(2);
        assert_preorder_widths(&index);
        index.collapse(0);
        assert_preorder_widths(&index);
        assert_eq!(index.row_count(), 2);
    }

    // Removed nodes must be freed, not leaked in the arena.
    #[test]
    fn node_count_tracks_the_sequence() {
        let mut index = index_of(two_roots());
        assert_eq!(index.node_count(), index.row_count());
        index.expand(0);
        index.expand(2);
        assert_eq!(index.node_count(), index.row_count());
        index.collapse(0);
        assert_eq!(index.node_count(), index.row_count());
        assert_eq!(index.node_count(), 2);
    }
}
