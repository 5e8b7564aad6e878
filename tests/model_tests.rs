use std::cell::Cell;
use std::collections::BTreeSet;
use std::ops::Bound;
use std::rc::Rc;

use proptest::prelude::*;
use simplelog::{LevelFilter, TestLogger};

use rbset::keys::{decode, encode};
use rbset::{NodeId, TreeSet, TreeSetError};

fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Warn, simplelog::Config::default());
}

#[derive(Clone, Debug)]
enum Op {
    Insert(i16),
    Remove(i16),
    Erase(i16),
    Find(i16),
    LowerBound(i16),
    UpperBound(i16),
    Range(i16, i16),
    Clear,
}

// A narrow key range so inserts collide and removes mostly hit.
fn key_strategy() -> impl Strategy<Value = i16> + Clone {
    -300i16..300
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        40 => key.clone().prop_map(Op::Insert),
        20 => key.clone().prop_map(Op::Remove),
        10 => key.clone().prop_map(Op::Erase),
        10 => key.clone().prop_map(Op::Find),
        8 => key.clone().prop_map(Op::LowerBound),
        8 => key.clone().prop_map(Op::UpperBound),
        3 => (key.clone(), key.clone()).prop_map(|(a, b)| Op::Range(a.min(b), a.max(b))),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=2000)
}

fn value(set: &TreeSet, handle: Option<NodeId>) -> Option<i16> {
    handle.and_then(|h| set.get(h)).and_then(decode::<i16>)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 20_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreeset(ops in ops_strategy()) {
        init_logging();
        let released = Rc::new(Cell::new(0usize));
        let counter = released.clone();
        let mut set = TreeSet::for_numbers::<i16>().with_releaser(move |_| counter.set(counter.get() + 1));
        let mut model: BTreeSet<i16> = BTreeSet::new();
        let mut added = 0usize;

        for op in ops {
            match op {
                Op::Insert(k) => {
                    let inserted = set.insert(&encode(k)).unwrap();
                    prop_assert_eq!(inserted, model.insert(k));
                    added += usize::from(inserted);
                }
                Op::Remove(k) => {
                    prop_assert_eq!(set.remove(&encode(k)).unwrap(), model.remove(&k));
                }
                Op::Erase(k) => match set.find(&encode(k)) {
                    Some(handle) => {
                        set.erase(handle).unwrap();
                        prop_assert!(model.remove(&k));
                    }
                    None => prop_assert!(!model.contains(&k)),
                },
                Op::Find(k) => {
                    prop_assert_eq!(value(&set, set.find(&encode(k))), model.get(&k).copied());
                }
                Op::LowerBound(k) => {
                    prop_assert_eq!(
                        value(&set, set.lower_bound(&encode(k))),
                        model.range(k..).next().copied()
                    );
                }
                Op::UpperBound(k) => {
                    prop_assert_eq!(
                        value(&set, set.upper_bound(&encode(k))),
                        model.range((Bound::Excluded(k), Bound::Unbounded)).next().copied()
                    );
                }
                Op::Range(a, b) => {
                    let (ab, bb) = (encode(a), encode(b));
                    let got: Vec<i16> = set
                        .range(Bound::Included(&ab[..]), Bound::Included(&bb[..]))
                        .filter_map(|(_, d)| decode::<i16>(d))
                        .collect();
                    let want: Vec<i16> = model.range(a..=b).copied().collect();
                    prop_assert_eq!(got, want);
                }
                Op::Clear => {
                    set.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(set.len(), model.len());
        }

        let stats = set.validate();
        prop_assert!(stats.is_ok(), "{:?}", stats);
        let got: Vec<i16> = set.iter().filter_map(|(_, d)| decode::<i16>(d)).collect();
        let want: Vec<i16> = model.iter().copied().collect();
        prop_assert_eq!(got, want);

        drop(set);
        prop_assert_eq!(released.get(), added);
    }

    #[test]
    fn prop_height_is_logarithmic(keys in prop::collection::vec(any::<u32>(), 1..=4000)) {
        let mut set = TreeSet::for_numbers::<u32>();
        for k in &keys {
            set.insert(&encode(*k)).unwrap();
        }
        let stats = set.validate().unwrap();
        // Red-black bound: height <= 2 * log2(n + 1).
        let bound = 2.0 * ((stats.len + 1) as f64).log2();
        prop_assert!(stats.height as f64 <= bound, "height {} for {} nodes", stats.height, stats.len);
    }
}

#[test]
fn test_wrong_size_leaves_set_untouched() {
    init_logging();
    let mut set = TreeSet::for_numbers::<u32>();
    set.insert(&encode(1u32)).unwrap();
    assert_eq!(
        set.remove(&[0u8; 8]),
        Err(TreeSetError::ElementSize {
            expected: 4,
            actual: 8
        })
    );
    assert_eq!(set.len(), 1);
    assert!(set.validate().is_ok());
}

#[test]
fn test_sorted_and_reverse_runs() {
    init_logging();
    let mut set = TreeSet::for_numbers::<i64>();
    for k in (0..10_000i64).chain((-10_000..0).rev()) {
        assert!(set.insert(&encode(k)).unwrap());
    }
    let stats = set.validate().unwrap();
    assert_eq!(stats.len, 20_000);
    assert!(stats.height <= 30);

    for k in (-10_000..10_000i64).step_by(2) {
        assert!(set.remove(&encode(k)).unwrap());
    }
    set.validate().unwrap();
    let got: Vec<i64> = set.iter().filter_map(|(_, d)| decode::<i64>(d)).collect();
    let want: Vec<i64> = (-10_000..10_000i64).filter(|k| k % 2 != 0).collect();
    assert_eq!(got, want);
}
