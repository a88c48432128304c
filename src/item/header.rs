use std::any::Any;

use crate::item::{ItemKind, TreeItem};

/// A static section header: label only, never expandable.
#[derive(Debug, Clone)]
pub struct HeaderItem {
    label: String,
}

impl HeaderItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl TreeItem for HeaderItem {
    fn display_text(&self) -> String {
        self.label.clone()
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Header
    }

    fn on_selected(&mut self) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A generic label-only leaf row.
#[derive(Debug, Clone)]
pub struct LeafItem {
    label: String,
}

impl LeafItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl TreeItem for LeafItem {
    fn display_text(&self) -> String {
        self.label.clone()
    }

    fn on_selected(&mut self) {
        tracing::debug!(label = %self.label, "selected");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
