use crate::{LayoutId, NodeId};

/// Ordered children of a layout level.
///
/// Holds node ids into the arena of the layout named by `reference`. The
/// collection is read-only outside this crate: inserts go through
/// [`LayoutObject`](crate::LayoutObject), which sets each inserted entity's
/// root to this collection's reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceAwareCollection {
    reference: Option<LayoutId>,
    nodes: Vec<NodeId>,
}

impl ReferenceAwareCollection {
    pub(crate) fn new(reference: LayoutId) -> Self {
        Self {
            reference: Some(reference),
            nodes: Vec::new(),
        }
    }

    pub(crate) fn detached() -> Self {
        Self::default()
    }

    /// The owning layout, `None` for a detached entity's collection.
    pub fn reference(&self) -> Option<LayoutId> {
        self.reference
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    pub(crate) fn push(&mut self, node: NodeId) {
        self.nodes.push(node);
    }

    pub(crate) fn replace(&mut self, index: usize, node: NodeId) -> NodeId {
        std::mem::replace(&mut self.nodes[index], node)
    }

    pub(crate) fn remove(&mut self, index: usize) -> NodeId {
        self.nodes.remove(index)
    }
}
