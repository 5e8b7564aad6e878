//! Statistics and introspection.
//!
//! Walks the whole tree to check every red-black and ordering invariant, and reports the shape it
//! found. Used by the test suites, benches and fuzz targets; cheap enough to call after every
//! mutation while debugging but linear, so not something to leave in a hot path.

use std::cmp::Ordering;

use crate::error::InvariantViolation;
use crate::node::NodeId;
use crate::store::NodeStore;
use crate::tree::Tree;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes reachable from the root.
    pub len: usize,
    /// Nodes on the longest root-to-leaf path.
    pub height: usize,
    /// Black nodes on every root-to-leaf path.
    pub black_height: usize,
    pub red_nodes: usize,
}

impl<S: NodeStore> Tree<S> {
    pub(crate) fn validate<C>(
        &self,
        cmp: &C,
        recorded: usize,
    ) -> Result<TreeStats, InvariantViolation>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + ?Sized,
    {
        let mut stats = TreeStats::default();
        if let Some(root) = self.root {
            let node = self.store.get(root).ok_or(InvariantViolation::Dangling)?;
            if node.is_red() {
                return Err(InvariantViolation::RedRoot);
            }
        }
        stats.black_height = self.validate_recurse(self.root, false, 0, &mut stats)?;

        let mut prev: Option<&[u8]> = None;
        for (position, (_, data)) in self.iter().enumerate() {
            if let Some(prev) = prev {
                if cmp(prev, data) != Ordering::Less {
                    return Err(InvariantViolation::Unordered { position });
                }
            }
            prev = Some(data);
        }

        if stats.len != recorded {
            return Err(InvariantViolation::Count {
                recorded,
                reachable: stats.len,
            });
        }
        Ok(stats)
    }

    // Returns the black height below (and including) `id`.
    fn validate_recurse(
        &self,
        id: Option<NodeId>,
        parent_red: bool,
        depth: usize,
        stats: &mut TreeStats,
    ) -> Result<usize, InvariantViolation> {
        let Some(id) = id else {
            stats.height = stats.height.max(depth);
            return Ok(0);
        };
        let node = self.store.get(id).ok_or(InvariantViolation::Dangling)?;
        stats.len += 1;
        if node.is_red() {
            if parent_red {
                return Err(InvariantViolation::RedRed { depth });
            }
            stats.red_nodes += 1;
        }

        let left = self.validate_recurse(node.left, node.is_red(), depth + 1, stats)?;
        let right = self.validate_recurse(node.right, node.is_red(), depth + 1, stats)?;
        if left != right {
            return Err(InvariantViolation::BlackHeight { left, right });
        }
        Ok(left + usize::from(!node.is_red()))
    }

    pub(crate) fn print_tree(&self) {
        let Some(root) = self.root else {
            eprintln!("[]");
            return;
        };
        self.print_tree_recurse(root, 0);
    }

    fn print_tree_recurse(&self, id: NodeId, depth: usize) {
        let indent = "  ".repeat(depth);
        let node = self.store.node(id);
        let bytes = node
            .data()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        eprintln!("{}{:?} [{}] {:?}", indent, id, bytes, node.color());
        if let Some(left) = node.left {
            self.print_tree_recurse(left, depth + 1);
        }
        if let Some(right) = node.right {
            self.print_tree_recurse(right, depth + 1);
        }
    }
}
