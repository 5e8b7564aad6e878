use smallvec::SmallVec;

use crate::node::NodeId;

/// Red-black height is at most 2·log₂(n+1), and n can't exceed the address space, so this many
/// inline slots always suffice. Anything deeper means a broken comparator; we spill rather than
/// overflow.
pub(crate) const PATH_CAPACITY: usize = 2 * usize::BITS as usize;

/// Ancestors visited on the way down, root first. Stands in for parent pointers during fix-up.
pub(crate) struct PathStack {
    nodes: SmallVec<[NodeId; PATH_CAPACITY]>,
}

impl PathStack {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SmallVec::new(),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, id: NodeId) {
        self.nodes.push(id);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        self.nodes.pop()
    }

    #[inline]
    pub(crate) fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// The entry `back` places below the top; `from_top(0)` is `last()`.
    #[inline]
    pub(crate) fn from_top(&self, back: usize) -> Option<NodeId> {
        let len = self.nodes.len();
        if back < len {
            Some(self.nodes[len - 1 - back])
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn extend<I: IntoIterator<Item = NodeId>>(&mut self, ids: I) {
        self.nodes.extend(ids);
    }

    pub(crate) fn spilled(&self) -> bool {
        self.nodes.spilled()
    }
}
