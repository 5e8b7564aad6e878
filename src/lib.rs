//! An ordered set of fixed-size, opaque byte elements, kept in a red-black tree.
//!
//! Nodes live in an index arena ([`SlabNodeStore`] by default) and link to their children by
//! [`NodeId`]. The tree keeps no parent links; operations record their descent path instead.

pub mod config;
pub mod error;
mod erase;
mod insert;
pub mod iter;
pub mod keys;
mod node;
mod path;
mod query;
mod rotate;
pub mod set;
pub mod stats;
pub mod store;
mod tree;
pub mod utils;

pub use config::Config;
pub use error::{InvariantViolation, TreeSetError};
pub use iter::{Iter, Range};
pub use node::{Color, Node, NodeId};
pub use set::{Comparator, Releaser, TreeSet};
pub use stats::TreeStats;
pub use store::{NodeStore, SlabNodeStore};
