use std::cmp::Ordering;

use log::{trace, warn};

use crate::error::TreeSetError;
use crate::node::{is_black, set_color, Color, Node, NodeId};
use crate::path::PathStack;
use crate::store::NodeStore;
use crate::tree::{Side, Tree};

impl<S: NodeStore> Tree<S> {
    /// Plain BST insert. Every node visited is pushed onto `path`, and so is the new node if one
    /// is made. A comparator tie hands back the existing node with `false`.
    ///
    /// Nothing is linked until the new node has been allocated, so an allocation failure leaves
    /// the tree as it was.
    pub(crate) fn bst_emplace<C>(
        &mut self,
        data: &[u8],
        cmp: &C,
        path: &mut PathStack,
    ) -> Result<(NodeId, bool), TreeSetError>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + ?Sized,
    {
        let mut cursor = self.root;
        let mut slot: Option<(NodeId, Side)> = None;
        while let Some(id) = cursor {
            path.push(id);
            let node = self.store.node(id);
            let side = match cmp(data, node.data()) {
                Ordering::Equal => return Ok((id, false)),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            cursor = self.child(id, side);
            slot = Some((id, side));
        }

        if path.spilled() {
            warn!(
                "descent went {} levels deep; comparator may not be a total order",
                path.len()
            );
        }

        // A lone root goes in black straight away; anything else starts red.
        let color = if slot.is_none() {
            Color::Black
        } else {
            Color::Red
        };
        let id = self.store.allocate(Node::create(color, data)?)?;
        match slot {
            None => self.root = Some(id),
            Some((parent, side)) => self.set_child(parent, side, Some(id)),
        }
        path.push(id);
        Ok((id, true))
    }

    /// Restore the red-black invariants after `bst_emplace` linked a new red node at the top of
    /// `path`. Recolors walk up two levels at a time; a black uncle is settled with at most two
    /// rotations.
    pub(crate) fn insert_rebalance(&mut self, path: &PathStack) {
        // Index of the current (red) node in `path`.
        let mut i = path.len().saturating_sub(1);
        while i >= 2 {
            let (Some(node), Some(parent), Some(grand)) =
                (path.get(i), path.get(i - 1), path.get(i - 2))
            else {
                break;
            };
            if is_black(&self.store, Some(parent)) {
                break;
            }

            let parent_side = match self.side_of(grand, parent) {
                Some(side) => side,
                None => break,
            };
            let uncle = match parent_side {
                Side::Left => self.store.node(grand).right,
                Side::Right => self.store.node(grand).left,
            };

            if !is_black(&self.store, uncle) {
                trace!("insert fix-up: recolor at {grand:?}");
                set_color(&mut self.store, Some(parent), Color::Black);
                set_color(&mut self.store, uncle, Color::Black);
                set_color(&mut self.store, Some(grand), Color::Red);
                i -= 2;
                continue;
            }

            let great = if i >= 3 { path.get(i - 3) } else { None };
            let mut top = parent;
            match parent_side {
                Side::Left => {
                    if self.store.node(parent).right == Some(node) {
                        self.rotate_left(parent, Some(grand));
                        top = node;
                    }
                    self.rotate_right(grand, great);
                }
                Side::Right => {
                    if self.store.node(parent).left == Some(node) {
                        self.rotate_right(parent, Some(grand));
                        top = node;
                    }
                    self.rotate_left(grand, great);
                }
            }
            trace!("insert fix-up: {top:?} replaces {grand:?}");
            // The grandparent was black (its child was red), the new subtree top was red.
            set_color(&mut self.store, Some(grand), Color::Red);
            set_color(&mut self.store, Some(top), Color::Black);
            break;
        }

        set_color(&mut self.store, self.root, Color::Black);
    }

    pub(crate) fn emplace<C>(&mut self, data: &[u8], cmp: &C) -> Result<(NodeId, bool), TreeSetError>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + ?Sized,
    {
        let mut path = PathStack::new();
        let (id, inserted) = self.bst_emplace(data, cmp, &mut path)?;
        if inserted {
            self.insert_rebalance(&path);
        }
        Ok((id, inserted))
    }
}
