use crate::item::TreeItem;

/// Generation-checked handle to a node in the arena.
///
/// Handles held by outside code keep working across unrelated mutations; a
/// handle whose node has been removed goes stale and all lookups return
/// `None` (the slot's generation is bumped on free, so a reused slot can
/// never be confused with the old node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// One materialized row: an item plus its tree position metadata.
pub(crate) struct Node {
    pub item: Box<dyn TreeItem>,
    pub indent: usize,
    pub expanded: bool,
    pub parent: Option<NodeId>,
    /// Immediate children currently materialized.
    pub direct_children: usize,
    /// All materialized descendants (the subtree width minus one).
    pub descendants: usize,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owned storage for nodes, addressed by [`NodeId`].
pub(crate) struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Remove the node, returning it and invalidating the handle.
    pub fn free(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation += 1;
        self.free.push(id.index);
        Some(node)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}
