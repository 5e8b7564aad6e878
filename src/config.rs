//! Set construction parameters.

use crate::error::TreeSetError;

/// Configuration for a [`crate::TreeSet`].
///
/// Validated at construction; all values are fixed for the lifetime of the set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Size in bytes of every element. Must be non-zero.
    pub element_size: usize,

    /// Node slots reserved up front by the default slab store.
    ///
    /// Default: 32.
    pub initial_capacity: usize,

    /// Hard cap on the number of live nodes, or `None` for unbounded.
    ///
    /// Inserting past the cap fails with `CapacityExceeded` and leaves the set unchanged.
    pub max_nodes: Option<usize>,
}

impl Config {
    /// Default number of pre-reserved node slots.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 32;

    /// Create a config for elements of `element_size` bytes with defaults elsewhere.
    pub fn new(element_size: usize) -> Self {
        Self {
            element_size,
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            max_nodes: None,
        }
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    pub fn validate(&self) -> Result<(), TreeSetError> {
        if self.element_size == 0 {
            return Err(TreeSetError::ZeroElementSize);
        }
        Ok(())
    }
}
