use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound;

use log::debug;
use num_traits::ops::bytes::{FromBytes, ToBytes};
use num_traits::Zero;

use crate::config::Config;
use crate::error::{InvariantViolation, TreeSetError};
use crate::iter::{Iter, Range};
use crate::keys::natural_order;
use crate::node::NodeId;
use crate::stats::TreeStats;
use crate::store::{NodeStore, SlabNodeStore};
use crate::tree::Tree;

/// Total order over elements: `cmp(a, b)` says where `a` sorts relative to `b`.
pub type Comparator = dyn Fn(&[u8], &[u8]) -> Ordering;

/// Called with an element's bytes when its node is destroyed.
pub type Releaser = dyn FnMut(Box<[u8]>);

/// An ordered set of fixed-size byte elements, kept in a red-black tree.
///
/// Elements are copied in on insert and owned by the set until they are removed or the set is
/// cleared or dropped, at which point each is handed to the set's releaser exactly once.
///
/// Handles ([`NodeId`]) returned by lookups are plain indices into the node store. They stay
/// meaningful until the next mutation; after that a handle may name nothing, or another element.
///
/// Every lookup and mutation has a `*_by` twin taking a comparator for that one call. Mutating
/// with a comparator that disagrees with the set's own order leaves the tree mis-sorted for later
/// calls; that is the caller's business.
pub struct TreeSet<S: NodeStore = SlabNodeStore> {
    tree: Tree<S>,
    len: usize,
    comparator: Box<Comparator>,
    releaser: Box<Releaser>,
    element_size: usize,
}

impl TreeSet<SlabNodeStore> {
    pub fn new<C>(element_size: usize, comparator: C) -> Result<Self, TreeSetError>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + 'static,
    {
        Self::with_config(Config::new(element_size), comparator)
    }

    pub fn with_config<C>(config: Config, comparator: C) -> Result<Self, TreeSetError>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + 'static,
    {
        config.validate()?;
        let store = SlabNodeStore::from_config(&config);
        Self::with_store(store, config.element_size, comparator)
    }

    /// A set of `T`s, ordered numerically. Elements are `T`'s native-endian bytes; see
    /// [`crate::keys`].
    pub fn for_numbers<T>() -> Self
    where
        T: FromBytes + ToBytes<Bytes = <T as FromBytes>::Bytes> + Zero + Ord + 'static,
        <T as FromBytes>::Bytes: Sized,
    {
        Self {
            tree: Tree::new(SlabNodeStore::new()),
            len: 0,
            comparator: Box::new(natural_order::<T>()),
            releaser: Box::new(drop),
            element_size: std::mem::size_of::<T>(),
        }
    }
}

impl<S: NodeStore> TreeSet<S> {
    /// Build a set over a caller-supplied store. The store should be empty.
    pub fn with_store<C>(store: S, element_size: usize, comparator: C) -> Result<Self, TreeSetError>
    where
        C: Fn(&[u8], &[u8]) -> Ordering + 'static,
    {
        if element_size == 0 {
            return Err(TreeSetError::ZeroElementSize);
        }
        Ok(Self {
            tree: Tree::new(store),
            len: 0,
            comparator: Box::new(comparator),
            releaser: Box::new(drop),
            element_size,
        })
    }

    /// Replace the releaser. The default just drops the bytes.
    pub fn with_releaser<F>(mut self, releaser: F) -> Self
    where
        F: FnMut(Box<[u8]>) + 'static,
    {
        self.releaser = Box::new(releaser);
        self
    }

    fn check_size(&self, data: &[u8]) -> Result<(), TreeSetError> {
        if data.len() != self.element_size {
            return Err(TreeSetError::ElementSize {
                expected: self.element_size,
                actual: data.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn store(&self) -> &S {
        &self.tree.store
    }

    /// `true` if `data` was added, `false` if an equal element was already present.
    pub fn insert(&mut self, data: &[u8]) -> Result<bool, TreeSetError> {
        self.emplace(data).map(|(_, inserted)| inserted)
    }

    pub fn insert_by<C>(&mut self, data: &[u8], cmp: C) -> Result<bool, TreeSetError>
    where
        C: Fn(&[u8], &[u8]) -> Ordering,
    {
        self.emplace_by(data, cmp).map(|(_, inserted)| inserted)
    }

    /// Insert-or-locate: the handle of the element equal to `data`, and whether it was just added.
    pub fn emplace(&mut self, data: &[u8]) -> Result<(NodeId, bool), TreeSetError> {
        self.check_size(data)?;
        let result = self.tree.emplace(data, &*self.comparator)?;
        if result.1 {
            self.len += 1;
        }
        Ok(result)
    }

    pub fn emplace_by<C>(&mut self, data: &[u8], cmp: C) -> Result<(NodeId, bool), TreeSetError>
    where
        C: Fn(&[u8], &[u8]) -> Ordering,
    {
        self.check_size(data)?;
        let result = self.tree.emplace(data, &cmp)?;
        if result.1 {
            self.len += 1;
        }
        Ok(result)
    }

    /// Remove the element equal to `data`. `Ok(false)` if there is none.
    pub fn remove(&mut self, data: &[u8]) -> Result<bool, TreeSetError> {
        self.check_size(data)?;
        let removed = self.tree.remove(data, &*self.comparator)?;
        Ok(self.release_removed(removed))
    }

    pub fn remove_by<C>(&mut self, data: &[u8], cmp: C) -> Result<bool, TreeSetError>
    where
        C: Fn(&[u8], &[u8]) -> Ordering,
    {
        self.check_size(data)?;
        let removed = self.tree.remove(data, &cmp)?;
        Ok(self.release_removed(removed))
    }

    /// Remove the element named by `handle`. Fails with `InvalidIterator` if the handle is not
    /// reachable from the root under the set's own comparator.
    pub fn erase(&mut self, handle: NodeId) -> Result<(), TreeSetError> {
        let bytes = self.tree.erase(handle, &*self.comparator)?;
        self.release_removed(Some(bytes));
        Ok(())
    }

    fn release_removed(&mut self, removed: Option<Box<[u8]>>) -> bool {
        match removed {
            Some(bytes) => {
                self.len -= 1;
                (self.releaser)(bytes);
                true
            }
            None => false,
        }
    }

    pub fn find(&self, data: &[u8]) -> Option<NodeId> {
        self.tree.find(data, &*self.comparator)
    }

    pub fn find_by<C>(&self, data: &[u8], cmp: C) -> Option<NodeId>
    where
        C: Fn(&[u8], &[u8]) -> Ordering,
    {
        self.tree.find(data, &cmp)
    }

    pub fn contains(&self, data: &[u8]) -> bool {
        self.find(data).is_some()
    }

    pub fn contains_by<C>(&self, data: &[u8], cmp: C) -> bool
    where
        C: Fn(&[u8], &[u8]) -> Ordering,
    {
        self.find_by(data, cmp).is_some()
    }

    /// The smallest element not less than `data`.
    pub fn lower_bound(&self, data: &[u8]) -> Option<NodeId> {
        self.tree.lower_bound(data, &*self.comparator)
    }

    pub fn lower_bound_by<C>(&self, data: &[u8], cmp: C) -> Option<NodeId>
    where
        C: Fn(&[u8], &[u8]) -> Ordering,
    {
        self.tree.lower_bound(data, &cmp)
    }

    /// The smallest element greater than `data`.
    pub fn upper_bound(&self, data: &[u8]) -> Option<NodeId> {
        self.tree.upper_bound(data, &*self.comparator)
    }

    pub fn upper_bound_by<C>(&self, data: &[u8], cmp: C) -> Option<NodeId>
    where
        C: Fn(&[u8], &[u8]) -> Ordering,
    {
        self.tree.upper_bound(data, &cmp)
    }

    pub fn first(&self) -> Option<NodeId> {
        self.tree.first()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.tree.last()
    }

    /// The element behind `handle`, if the handle names a live node.
    pub fn get(&self, handle: NodeId) -> Option<&[u8]> {
        self.tree.store.get(handle).map(|node| node.data())
    }

    pub fn iter(&self) -> Iter<'_, S> {
        self.tree.iter()
    }

    /// Elements between `start` and `end`, in order.
    pub fn range<'a>(&'a self, start: Bound<&'a [u8]>, end: Bound<&'a [u8]>) -> Range<'a, S> {
        Range::new(&self.tree, start, end, &*self.comparator)
    }

    /// Release every element through the set's releaser and free all nodes.
    pub fn clear(&mut self) {
        if self.len > 0 {
            debug!("clearing set of {} elements", self.len);
        }
        self.tree.destroy(&mut *self.releaser);
        self.len = 0;
    }

    /// Like [`TreeSet::clear`], but hands elements to `release` instead of the set's releaser.
    pub fn clear_with<F>(&mut self, mut release: F)
    where
        F: FnMut(Box<[u8]>),
    {
        if self.len > 0 {
            debug!("clearing set of {} elements with a one-off releaser", self.len);
        }
        self.tree.destroy(&mut release);
        self.len = 0;
    }

    /// Check every red-black and ordering invariant, returning the tree's shape.
    pub fn validate(&self) -> Result<TreeStats, InvariantViolation> {
        self.tree.validate(&*self.comparator, self.len)
    }

    /// Dump the tree structure to stderr.
    pub fn print_tree(&self) {
        self.tree.print_tree();
    }
}

impl<S: NodeStore> Drop for TreeSet<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<S: NodeStore> fmt::Debug for TreeSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|(_, data)| data)).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::seq::SliceRandom;
    use rand::thread_rng;

    use super::*;
    use crate::keys::{decode, encode};

    fn i32_set() -> TreeSet {
        TreeSet::for_numbers::<i32>()
    }

    fn values(set: &TreeSet) -> Vec<i32> {
        set.iter()
            .map(|(_, d)| decode::<i32>(d).unwrap())
            .collect()
    }

    fn value_of(set: &TreeSet, handle: Option<NodeId>) -> Option<i32> {
        handle
            .and_then(|h| set.get(h))
            .and_then(decode::<i32>)
    }

    #[test]
    fn test_reference_scenario() {
        let mut set = i32_set();
        for v in [10, 20, 5, 15, 25, 3] {
            assert!(set.insert(&encode(v)).unwrap());
        }
        assert_eq!(values(&set), vec![3, 5, 10, 15, 20, 25]);
        assert_eq!(value_of(&set, set.lower_bound(&encode(12))), Some(15));
        assert_eq!(value_of(&set, set.upper_bound(&encode(20))), Some(25));

        assert!(set.remove(&encode(10)).unwrap());
        assert!(set.remove(&encode(20)).unwrap());
        assert_eq!(values(&set), vec![3, 5, 15, 25]);
        let stats = set.validate().unwrap();
        assert_eq!(stats.len, 4);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_insert_twice() {
        let mut set = i32_set();
        assert!(set.insert(&encode(7)).unwrap());
        assert!(!set.insert(&encode(7)).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_emplace_handle_always_valid() {
        let mut set = i32_set();
        let (h1, inserted) = set.emplace(&encode(99)).unwrap();
        assert!(inserted);
        let (h2, inserted) = set.emplace(&encode(99)).unwrap();
        assert!(!inserted);
        assert_eq!(h1, h2);
        assert_eq!(value_of(&set, Some(h2)), Some(99));
    }

    #[test]
    fn test_wrong_size_rejected() {
        let mut set = i32_set();
        assert_eq!(
            set.insert(&[1, 2]),
            Err(TreeSetError::ElementSize {
                expected: 4,
                actual: 2
            })
        );
        assert!(set.is_empty());
        assert!(TreeSet::new(0, |a: &[u8], b: &[u8]| a.cmp(b)).is_err());
    }

    #[test]
    fn test_bounds_at_edges() {
        let mut set = i32_set();
        assert_eq!(set.lower_bound(&encode(0)), None);
        for v in [-5, 0, 5] {
            set.insert(&encode(v)).unwrap();
        }
        assert_eq!(value_of(&set, set.lower_bound(&encode(-100))), Some(-5));
        assert_eq!(value_of(&set, set.lower_bound(&encode(0))), Some(0));
        assert_eq!(value_of(&set, set.upper_bound(&encode(0))), Some(5));
        assert_eq!(set.upper_bound(&encode(5)), None);
        assert_eq!(set.lower_bound(&encode(6)), None);
        assert_eq!(value_of(&set, set.first()), Some(-5));
        assert_eq!(value_of(&set, set.last()), Some(5));
    }

    #[test]
    fn test_erase_handle() {
        let mut set = i32_set();
        for v in 0..100 {
            set.insert(&encode(v)).unwrap();
        }
        let h = set.find(&encode(50)).unwrap();
        set.erase(h).unwrap();
        assert!(!set.contains(&encode(50)));
        assert_eq!(set.len(), 99);
        assert_eq!(set.erase(h), Err(TreeSetError::InvalidIterator));
        set.validate().unwrap();
    }

    #[test]
    fn test_custom_comparator_per_call() {
        // Ordered by the low byte only, so 0x0101 and 0x0201 collide under it.
        let mut set = TreeSet::new(2, |a: &[u8], b: &[u8]| a.cmp(b)).unwrap();
        set.insert(&[0x01, 0x01]).unwrap();
        set.insert(&[0x02, 0x05]).unwrap();
        let low_byte = |a: &[u8], b: &[u8]| a[1].cmp(&b[1]);
        assert!(set.contains_by(&[0x09, 0x01], low_byte));
        assert!(!set.contains(&[0x09, 0x01]));
        assert!(set.find_by(&[0x00, 0x05], low_byte).is_some());
        assert!(set.remove_by(&[0x07, 0x05], low_byte).unwrap());
        assert_eq!(set.len(), 1);
        set.validate().unwrap();
    }

    #[test]
    fn test_releaser_called_once_per_element() {
        let released = Rc::new(RefCell::new(Vec::new()));
        let sink = released.clone();
        let mut set = TreeSet::for_numbers::<u16>()
            .with_releaser(move |bytes| sink.borrow_mut().push(decode::<u16>(&bytes).unwrap()));

        for v in 0..50u16 {
            set.insert(&encode(v)).unwrap();
        }
        // Duplicates never reach the releaser: the caller's buffer was never taken.
        set.insert(&encode(3u16)).unwrap();
        set.remove(&encode(10u16)).unwrap();
        assert_eq!(*released.borrow(), vec![10]);

        drop(set);
        let mut all = released.borrow().clone();
        all.sort();
        assert_eq!(all, (0..50u16).collect::<Vec<_>>());
    }

    #[test]
    fn test_clear_with_overrides_releaser() {
        let default_calls = Rc::new(RefCell::new(0));
        let counter = default_calls.clone();
        let mut set = TreeSet::for_numbers::<u8>().with_releaser(move |_| *counter.borrow_mut() += 1);
        for v in 0..10u8 {
            set.insert(&[v]).unwrap();
        }
        let mut seen = 0;
        set.clear_with(|_| seen += 1);
        assert_eq!(seen, 10);
        assert!(set.is_empty());
        assert!(set.first().is_none());
        drop(set);
        assert_eq!(*default_calls.borrow(), 0);
    }

    #[test]
    fn test_capacity_limit_leaves_set_unchanged() {
        let config = Config::new(4).with_max_nodes(3);
        let mut set = TreeSet::with_config(config, natural_order::<u32>()).unwrap();
        for v in 0..3u32 {
            set.insert(&encode(v)).unwrap();
        }
        assert_eq!(
            set.insert(&encode(3u32)),
            Err(TreeSetError::CapacityExceeded { limit: 3 })
        );
        assert_eq!(set.len(), 3);
        set.validate().unwrap();
        // Room again once something leaves.
        set.remove(&encode(0u32)).unwrap();
        assert!(set.insert(&encode(3u32)).unwrap());
    }

    #[test]
    fn test_random_insert_remove() {
        let mut set = TreeSet::for_numbers::<u32>();
        let mut keys: Vec<u32> = (0..3000).map(|k| k * 7).collect();
        keys.shuffle(&mut thread_rng());
        for k in &keys {
            set.insert(&encode(*k)).unwrap();
        }
        set.validate().unwrap();
        for k in &keys {
            assert!(set.contains(&encode(*k)));
            assert!(!set.contains(&encode(*k + 1)));
        }
        keys.shuffle(&mut thread_rng());
        for (i, k) in keys.iter().enumerate() {
            assert!(set.remove(&encode(*k)).unwrap());
            if i % 50 == 0 {
                set.validate().unwrap();
            }
        }
        assert!(set.is_empty());
        assert!(set.store().is_empty());
    }

    #[test]
    fn test_range_and_debug() {
        let mut set = TreeSet::new(1, |a: &[u8], b: &[u8]| a.cmp(b)).unwrap();
        for v in [5u8, 1, 9, 3, 7] {
            set.insert(&[v]).unwrap();
        }
        let got: Vec<u8> = set
            .range(Bound::Included(&[3][..]), Bound::Excluded(&[9][..]))
            .map(|(_, d)| d[0])
            .collect();
        assert_eq!(got, vec![3, 5, 7]);
        assert_eq!(format!("{set:?}"), "{[1], [3], [5], [7], [9]}");
    }
}
