use crate::node::{recursive_destroy, NodeId};
use crate::store::NodeStore;

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// The bare red-black tree: a root link plus the store its nodes live in. Knows nothing about
/// comparators or element sizes; those are passed in by the set on every call so that a
/// per-call comparator never has to be stashed as state.
pub(crate) struct Tree<S: NodeStore> {
    pub(crate) root: Option<NodeId>,
    pub(crate) store: S,
}

impl<S: NodeStore> Tree<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { root: None, store }
    }

    #[inline]
    pub(crate) fn child(&self, parent: NodeId, side: Side) -> Option<NodeId> {
        let node = self.store.node(parent);
        match side {
            Side::Left => node.left,
            Side::Right => node.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        let node = self.store.node_mut(parent);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
    }

    /// Which side of `parent` holds `child`, or `None` if `parent` doesn't link to it at all.
    #[inline]
    pub(crate) fn side_of(&self, parent: NodeId, child: NodeId) -> Option<Side> {
        let node = self.store.node(parent);
        if node.left == Some(child) {
            Some(Side::Left)
        } else if node.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Point whatever held `old` (the root slot when `parent` is `None`) at `new` instead.
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        new: Option<NodeId>,
    ) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = self.store.node_mut(p);
                if node.right == Some(old) {
                    node.right = new;
                } else {
                    node.left = new;
                }
            }
        }
    }

    /// Tear the whole tree down, handing every element to `release`.
    pub(crate) fn destroy(&mut self, release: &mut dyn FnMut(Box<[u8]>)) {
        if let Some(root) = self.root.take() {
            recursive_destroy(&mut self.store, root, release);
        }
    }
}
