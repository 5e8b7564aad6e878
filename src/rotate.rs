use log::trace;

use crate::node::NodeId;
use crate::store::NodeStore;
use crate::tree::{Side, Tree};

// Rotations only move links; in-order sequence and colors are untouched. The caller supplies the
// pivot's parent since nodes don't carry one.
impl<S: NodeStore> Tree<S> {
    /// ```text
    ///     b                c
    ///    / \              / \
    ///   a   c     =>     b   e
    ///      / \          / \
    ///     d   e        a   d
    /// ```
    pub(crate) fn rotate_left(&mut self, pivot: NodeId, parent: Option<NodeId>) {
        let Some(c) = self.store.node(pivot).right else {
            return;
        };
        trace!("rotate left at {pivot:?}");
        self.replace_child(parent, pivot, Some(c));
        let inner = self.store.node(c).left;
        self.store.node_mut(pivot).right = inner;
        self.store.node_mut(c).left = Some(pivot);
    }

    pub(crate) fn rotate_right(&mut self, pivot: NodeId, parent: Option<NodeId>) {
        let Some(c) = self.store.node(pivot).left else {
            return;
        };
        trace!("rotate right at {pivot:?}");
        self.replace_child(parent, pivot, Some(c));
        let inner = self.store.node(c).right;
        self.store.node_mut(pivot).left = inner;
        self.store.node_mut(c).right = Some(pivot);
    }

    /// Rotate so that `pivot` moves down toward `side`.
    #[inline]
    pub(crate) fn rotate_toward(&mut self, side: Side, pivot: NodeId, parent: Option<NodeId>) {
        match side {
            Side::Left => self.rotate_left(pivot, parent),
            Side::Right => self.rotate_right(pivot, parent),
        }
    }
}
