use std::cmp::Ordering;
use std::ops::Bound;

use smallvec::SmallVec;

use crate::node::NodeId;
use crate::path::PATH_CAPACITY;
use crate::store::NodeStore;
use crate::tree::Tree;

impl<S: NodeStore> Tree<S> {
    pub(crate) fn iter(&self) -> Iter<'_, S> {
        Iter::new(self)
    }
}

/// In-order iterator over a set's elements, yielding each element's handle and bytes.
pub struct Iter<'a, S: NodeStore> {
    tree: &'a Tree<S>,
    // Nodes whose left subtree has been (or is being) visited but which haven't been yielded yet.
    stack: SmallVec<[NodeId; PATH_CAPACITY]>,
}

impl<'a, S: NodeStore> Iter<'a, S> {
    pub(crate) fn new(tree: &'a Tree<S>) -> Self {
        let mut iter = Self {
            tree,
            stack: SmallVec::new(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    /// Start at the first element satisfying `start`.
    pub(crate) fn seek<C>(tree: &'a Tree<S>, start: Bound<&[u8]>, cmp: &C) -> Self
    where
        C: Fn(&[u8], &[u8]) -> Ordering + ?Sized,
    {
        let mut stack = SmallVec::new();
        let mut cursor = tree.root;
        while let Some(id) = cursor {
            let node = tree.store.node(id);
            let qualifies = match start {
                Bound::Unbounded => true,
                Bound::Included(s) => cmp(s, node.data()) != Ordering::Greater,
                Bound::Excluded(s) => cmp(s, node.data()) == Ordering::Less,
            };
            if qualifies {
                stack.push(id);
                cursor = node.left;
            } else {
                cursor = node.right;
            }
        }
        Self { tree, stack }
    }

    fn push_left_spine(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            self.stack.push(id);
            cursor = self.tree.store.node(id).left;
        }
    }
}

impl<'a, S: NodeStore> Iterator for Iter<'a, S> {
    type Item = (NodeId, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.store.node(id);
        self.push_left_spine(node.right);
        Some((id, node.data()))
    }
}

/// In-order iterator over the elements between two bounds.
pub struct Range<'a, S: NodeStore> {
    iter: Iter<'a, S>,
    end: Bound<&'a [u8]>,
    cmp: &'a dyn Fn(&[u8], &[u8]) -> Ordering,
    done: bool,
}

impl<'a, S: NodeStore> Range<'a, S> {
    pub(crate) fn new(
        tree: &'a Tree<S>,
        start: Bound<&'a [u8]>,
        end: Bound<&'a [u8]>,
        cmp: &'a dyn Fn(&[u8], &[u8]) -> Ordering,
    ) -> Self {
        Self {
            iter: Iter::seek(tree, start, cmp),
            end,
            cmp,
            done: false,
        }
    }
}

impl<'a, S: NodeStore> Iterator for Range<'a, S> {
    type Item = (NodeId, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let (id, data) = self.iter.next()?;
        let within = match self.end {
            Bound::Unbounded => true,
            Bound::Included(end) => (self.cmp)(data, end) != Ordering::Greater,
            Bound::Excluded(end) => (self.cmp)(data, end) == Ordering::Less,
        };
        // Elements come out in order, so the first one past the end finishes the range.
        if !within {
            self.done = true;
            return None;
        }
        Some((id, data))
    }
}
