use std::ops::{Index, IndexMut};

use crate::error::TreeSetError;

// We use a u32 here instead of usize under the assumption there simply won't be that many entries
// and so that we can save some bytes in the nodes that link to each other by index.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FVIndex(pub u32);

enum Slot<V> {
    Occupied(V),
    Vacant,
}

/// A place to store (owned) values that can be accessed by an index, with holes being re-used.
/// Maintains a separate free list. A poor man's slot map or arena, really, but growth is fallible:
/// running out of memory (or past an optional hard limit) is reported instead of aborting.
pub struct FillVector<V> {
    values: Vec<Slot<V>>,
    // Always has capacity for every slot, so freeing never allocates.
    free_list: Vec<u32>,
    size: usize,
    limit: Option<usize>,
}

impl<V> FillVector<V> {
    pub fn new() -> Self {
        Self {
            values: vec![],
            free_list: Vec::with_capacity(16),
            size: 0,
            limit: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            free_list: Vec::with_capacity(capacity),
            size: 0,
            limit: None,
        }
    }

    /// Caps the number of live values. `add` past the cap fails with `CapacityExceeded`.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn add<F: FnOnce(FVIndex) -> V>(&mut self, f: F) -> Result<FVIndex, TreeSetError> {
        if let Some(limit) = self.limit {
            if self.size >= limit {
                return Err(TreeSetError::CapacityExceeded { limit });
            }
        }

        let id = match self.free_list.pop() {
            Some(idx) => {
                let id = FVIndex(idx);
                self.values[idx as usize] = Slot::Occupied(f(id));
                id
            }
            None => {
                if self.values.len() >= u32::MAX as usize {
                    return Err(TreeSetError::CapacityExceeded {
                        limit: u32::MAX as usize,
                    });
                }
                let requested = std::mem::size_of::<Slot<V>>();
                self.values
                    .try_reserve(1)
                    .map_err(|_| TreeSetError::OutOfMemory { requested })?;
                self.free_list
                    .try_reserve(self.values.len() + 1 - self.free_list.len())
                    .map_err(|_| TreeSetError::OutOfMemory {
                        requested: std::mem::size_of::<u32>(),
                    })?;
                let id = FVIndex(self.values.len() as u32);
                self.values.push(Slot::Occupied(f(id)));
                id
            }
        };
        self.size += 1;
        Ok(id)
    }

    /// Removes the value at `id`, handing it back. Returns `None` if the slot is already free or
    /// was never handed out.
    pub fn free(&mut self, id: FVIndex) -> Option<V> {
        let slot = self.values.get_mut(id.0 as usize)?;
        let Slot::Occupied(value) = std::mem::replace(slot, Slot::Vacant) else {
            return None;
        };
        self.free_list.push(id.0);
        self.size -= 1;
        Some(value)
    }

    pub fn get(&self, id: &FVIndex) -> Option<&V> {
        match self.values.get(id.0 as usize)? {
            Slot::Occupied(v) => Some(v),
            Slot::Vacant => None,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of slots, live or free.
    pub fn slots(&self) -> usize {
        self.values.len()
    }
}

impl<V> Index<FVIndex> for FillVector<V> {
    type Output = V;

    fn index(&self, index: FVIndex) -> &Self::Output {
        match &self.values[index.0 as usize] {
            Slot::Occupied(v) => v,
            Slot::Vacant => panic!("access to free slot {}", index.0),
        }
    }
}

impl<V> IndexMut<FVIndex> for FillVector<V> {
    fn index_mut(&mut self, index: FVIndex) -> &mut Self::Output {
        match &mut self.values[index.0 as usize] {
            Slot::Occupied(v) => v,
            Slot::Vacant => panic!("access to free slot {}", index.0),
        }
    }
}

impl<V> Default for FillVector<V> {
    fn default() -> Self {
        Self::new()
    }
}
