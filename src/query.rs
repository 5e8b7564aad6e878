use std::cmp::Ordering;

use crate::node::NodeId;
use crate::store::NodeStore;
use crate::tree::Tree;

impl<S: NodeStore> Tree<S> {
    pub(crate) fn find<C>(&self, data: &[u8], cmp: &C) -> Option<NodeId>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + ?Sized,
    {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.store.node(id);
            cursor = match cmp(data, node.data()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Smallest element not less than `data`.
    pub(crate) fn lower_bound<C>(&self, data: &[u8], cmp: &C) -> Option<NodeId>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + ?Sized,
    {
        let mut cursor = self.root;
        let mut candidate = None;
        while let Some(id) = cursor {
            let node = self.store.node(id);
            if cmp(data, node.data()) == Ordering::Greater {
                cursor = node.right;
            } else {
                candidate = Some(id);
                cursor = node.left;
            }
        }
        candidate
    }

    /// Smallest element strictly greater than `data`.
    pub(crate) fn upper_bound<C>(&self, data: &[u8], cmp: &C) -> Option<NodeId>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + ?Sized,
    {
        let mut cursor = self.root;
        let mut candidate = None;
        while let Some(id) = cursor {
            let node = self.store.node(id);
            if cmp(data, node.data()) == Ordering::Less {
                candidate = Some(id);
                cursor = node.left;
            } else {
                cursor = node.right;
            }
        }
        candidate
    }

    pub(crate) fn first(&self) -> Option<NodeId> {
        let mut id = self.root?;
        while let Some(left) = self.store.node(id).left {
            id = left;
        }
        Some(id)
    }

    pub(crate) fn last(&self) -> Option<NodeId> {
        let mut id = self.root?;
        while let Some(right) = self.store.node(id).right {
            id = right;
        }
        Some(id)
    }
}
