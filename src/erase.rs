use std::cmp::Ordering;

use log::{trace, warn};
use smallvec::SmallVec;

use crate::error::TreeSetError;
use crate::node::{is_black, set_color, Color, NodeId};
use crate::path::{PathStack, PATH_CAPACITY};
use crate::store::NodeStore;
use crate::tree::{Side, Tree};

/// What unlinking a node left behind for the fix-up.
pub(crate) struct Splice {
    /// Color of the node that physically left its slot: the target itself, or its in-order
    /// successor when the target had two children.
    removed: Color,
    /// Whatever now fills that slot.
    replacement: Option<NodeId>,
    /// Which child of `path.last()` the slot is.
    side: Side,
}

impl<S: NodeStore> Tree<S> {
    /// Unlink `target`, whose ancestors (root first) are in `path`. On return `path` leads to the
    /// parent of the vacated slot, reshaped if a successor was moved up.
    ///
    /// The claimed parent is checked before anything moves; if it doesn't link to `target` the
    /// tree is corrupt and is left untouched.
    pub(crate) fn bst_erase(
        &mut self,
        target: NodeId,
        path: &mut PathStack,
    ) -> Result<Splice, TreeSetError> {
        let parent = path.last();
        let target_side = match parent {
            None if self.root == Some(target) => None,
            None => {
                warn!("erase of {target:?}: claimed root but the root is {:?}", self.root);
                return Err(TreeSetError::InvalidParent);
            }
            Some(p) => match self.side_of(p, target) {
                Some(side) => Some(side),
                None => {
                    warn!("erase of {target:?}: {p:?} does not link to it");
                    return Err(TreeSetError::InvalidParent);
                }
            },
        };

        let (left, right, color) = {
            let node = self.store.node(target);
            (node.left, node.right, node.color)
        };

        match (left, right) {
            (Some(left), Some(right)) => {
                // Leftmost node of the right subtree, and the nodes passed on the way to it.
                let mut passed: SmallVec<[NodeId; PATH_CAPACITY]> = SmallVec::new();
                let mut successor_parent = target;
                let mut successor = right;
                while let Some(next) = self.store.node(successor).left {
                    passed.push(successor);
                    successor_parent = successor;
                    successor = next;
                }

                let successor_right = self.store.node(successor).right;
                let removed = self.store.node(successor).color;
                let side = if successor_parent == target {
                    // The successor is target's own right child and keeps its right subtree.
                    Side::Right
                } else {
                    self.store.node_mut(successor_parent).left = successor_right;
                    self.store.node_mut(successor).right = Some(right);
                    Side::Left
                };

                let node = self.store.node_mut(successor);
                node.left = Some(left);
                node.color = color;
                // Only the root slot is rewritten when target has no parent.
                self.replace_child(parent, target, Some(successor));

                path.push(successor);
                path.extend(passed);
                trace!("erase {target:?}: successor {successor:?} spliced in");
                Ok(Splice {
                    removed,
                    replacement: successor_right,
                    side,
                })
            }
            (child, None) | (None, child) => {
                self.replace_child(parent, target, child);
                Ok(Splice {
                    removed: color,
                    replacement: child,
                    side: target_side.unwrap_or(Side::Left),
                })
            }
        }
    }

    /// Repair black-height after a splice. A red node leaving costs nothing; a black one leaves
    /// its slot one black short, and that deficiency is pushed up `path` until a red node absorbs
    /// it or a rotation settles it.
    pub(crate) fn erase_rebalance(&mut self, splice: Splice, path: &mut PathStack) {
        if splice.removed == Color::Red {
            return;
        }

        let mut current = splice.replacement;
        let mut side = splice.side;
        while is_black(&self.store, current) {
            let Some(parent) = path.last() else {
                break;
            };
            let Some(mut sibling) = self.child(parent, side.opposite()) else {
                // A black-short slot always has a sibling subtree with black height >= 1.
                warn!("erase fix-up: {parent:?} has no sibling for the short side");
                break;
            };

            if self.store.node(sibling).is_red() {
                trace!("erase fix-up: red sibling {sibling:?}");
                set_color(&mut self.store, Some(sibling), Color::Black);
                set_color(&mut self.store, Some(parent), Color::Red);
                self.rotate_toward(side, parent, path.from_top(1));
                // The old sibling now sits between parent and its former parent.
                path.pop();
                path.push(sibling);
                path.push(parent);
                sibling = match self.child(parent, side.opposite()) {
                    Some(s) => s,
                    None => break,
                };
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());
            if is_black(&self.store, near) && is_black(&self.store, far) {
                trace!("erase fix-up: push deficiency up from {parent:?}");
                set_color(&mut self.store, Some(sibling), Color::Red);
                current = Some(parent);
                path.pop();
                side = match path.last() {
                    Some(grand) => self.side_of(grand, parent).unwrap_or(Side::Left),
                    None => Side::Left,
                };
                continue;
            }

            if is_black(&self.store, far) {
                // Near child is red: turn it into the far one.
                if let Some(near) = near {
                    set_color(&mut self.store, Some(near), Color::Black);
                    set_color(&mut self.store, Some(sibling), Color::Red);
                    self.rotate_toward(side.opposite(), sibling, Some(parent));
                    sibling = near;
                }
            }

            trace!("erase fix-up: rotate at {parent:?}");
            let parent_color = self.store.node(parent).color;
            set_color(&mut self.store, Some(sibling), parent_color);
            set_color(&mut self.store, Some(parent), Color::Black);
            let far = self.child(sibling, side.opposite());
            set_color(&mut self.store, far, Color::Black);
            self.rotate_toward(side, parent, path.from_top(1));
            current = self.root;
            break;
        }

        set_color(&mut self.store, current, Color::Black);
        set_color(&mut self.store, self.root, Color::Black);
    }

    /// Splice out `target`, rebalance, and give back its element.
    pub(crate) fn erase_at(
        &mut self,
        target: NodeId,
        path: &mut PathStack,
    ) -> Result<Box<[u8]>, TreeSetError> {
        let splice = self.bst_erase(target, path)?;
        self.erase_rebalance(splice, path);
        match self.store.release(target) {
            Some(node) => Ok(node.into_data()),
            None => Err(TreeSetError::InvalidIterator),
        }
    }

    /// Remove the element matching `data` under `cmp`, returning its bytes.
    pub(crate) fn remove<C>(
        &mut self,
        data: &[u8],
        cmp: &C,
    ) -> Result<Option<Box<[u8]>>, TreeSetError>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + ?Sized,
    {
        let mut path = PathStack::new();
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let side = match cmp(data, self.store.node(id).data()) {
                Ordering::Equal => return self.erase_at(id, &mut path).map(Some),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            path.push(id);
            cursor = self.child(id, side);
        }
        Ok(None)
    }

    /// Remove the node named by `handle`. The handle must be reachable from the root by
    /// descending with `cmp` on its own element.
    pub(crate) fn erase<C>(&mut self, handle: NodeId, cmp: &C) -> Result<Box<[u8]>, TreeSetError>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + ?Sized,
    {
        let mut path = PathStack::new();
        let found = {
            let Some(node) = self.store.get(handle) else {
                warn!("erase: {handle:?} is not a live node");
                return Err(TreeSetError::InvalidIterator);
            };
            let probe = node.data();
            let mut cursor = self.root;
            let mut found = None;
            while let Some(id) = cursor {
                let side = match cmp(probe, self.store.node(id).data()) {
                    Ordering::Equal => {
                        found = Some(id);
                        break;
                    }
                    Ordering::Less => Side::Left,
                    Ordering::Greater => Side::Right,
                };
                path.push(id);
                cursor = self.child(id, side);
            }
            found
        };

        match found {
            Some(id) if id == handle => self.erase_at(id, &mut path),
            _ => {
                warn!("erase: {handle:?} is not reachable from the root");
                Err(TreeSetError::InvalidIterator)
            }
        }
    }
}
