//! Flattened lazy tree index.
//!
//! The crate maintains a single ordered row sequence (a pre-order traversal)
//! over a forest of lazily populated tree items. Expanding a row asks the
//! item for its children and splices them into the sequence; collapsing
//! removes the whole subtree again. External code can insert or remove single
//! children at a logical position under an expanded node, which is resolved
//! to an absolute row offset by skipping per-node subtree widths rather than
//! re-traversing the tree.
//!
//! The engine is row-oriented on purpose: a list-bound UI only needs
//! `row_count`, `row_at`, and the bracketed insert/remove range notifications
//! delivered through a [`ChangeSink`] supplied at construction.
//!
//! Not internally synchronized: all mutation entry points must be called from
//! a single thread (typically the UI event loop).

pub mod error;
pub mod index;
pub mod item;

pub use error::{Error, Result};
pub use index::{ChangeSink, NodeId, NullSink, RowChange, TreeIndex};
pub use item::{ItemKind, TreeItem};
