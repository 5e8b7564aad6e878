//! Error types for set operations and invariant validation.

use std::error::Error;
use std::fmt;

/// Errors surfaced by the set. Local algorithms (rotations, fix-ups) never produce these; they
/// come from allocation, input validation and structural checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeSetError {
    /// Allocation of a node or its element buffer failed. The set is unchanged.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
    },
    /// The node store hit its configured node limit. The set is unchanged.
    CapacityExceeded {
        /// The configured limit, in nodes.
        limit: usize,
    },
    /// A handle that does not name a node of this set.
    InvalidIterator,
    /// The claimed parent of a node being deleted does not link to it; the tree is corrupt.
    InvalidParent,
    /// An element buffer whose length is not the set's element size.
    ElementSize {
        /// The set's element size.
        expected: usize,
        /// Length of the buffer passed in.
        actual: usize,
    },
    /// Sets cannot hold zero-sized elements.
    ZeroElementSize,
}

impl fmt::Display for TreeSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory allocating {requested} bytes")
            }
            Self::CapacityExceeded { limit } => {
                write!(f, "node store capacity exceeded: limit {limit} nodes")
            }
            Self::InvalidIterator => write!(f, "handle does not refer to an element of this set"),
            Self::InvalidParent => {
                write!(f, "parent does not link to the node being erased")
            }
            Self::ElementSize { expected, actual } => {
                write!(f, "element is {actual} bytes, set holds {expected}-byte elements")
            }
            Self::ZeroElementSize => write!(f, "element size must be non-zero"),
        }
    }
}

impl Error for TreeSetError {}

/// A broken red-black or ordering invariant found by [`crate::TreeSet::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root is red.
    RedRoot,
    /// A red node has a red child.
    RedRed {
        /// Depth of the child, root at 0.
        depth: usize,
    },
    /// Two paths from the root reach an absent child through different numbers of black nodes.
    BlackHeight {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// In-order traversal is not strictly increasing under the comparator.
    Unordered {
        /// In-order position of the offending element.
        position: usize,
    },
    /// The element count does not match the number of reachable nodes.
    Count {
        /// Count held by the set.
        recorded: usize,
        /// Nodes reached from the root.
        reachable: usize,
    },
    /// A child link points at a slot the store no longer holds.
    Dangling,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(f, "root is red"),
            Self::RedRed { depth } => write!(f, "red node with red child at depth {depth}"),
            Self::BlackHeight { left, right } => {
                write!(f, "black height mismatch: left {left}, right {right}")
            }
            Self::Unordered { position } => {
                write!(f, "elements out of order at position {position}")
            }
            Self::Count {
                recorded,
                reachable,
            } => write!(f, "size is {recorded} but {reachable} nodes are reachable"),
            Self::Dangling => write!(f, "child link to a released node"),
        }
    }
}

impl Error for InvariantViolation {}
