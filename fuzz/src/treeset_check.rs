#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rbset::keys::{decode, encode};
use rbset::{Config, TreeSet, TreeSetError};

#[derive(Arbitrary, Debug)]
enum SetMethod {
    Insert { key: u16 },
    Remove { key: u16 },
    Erase { key: u16 },
    Find { key: u16 },
    LowerBound { key: u16 },
    Clear,
}

const MAX_NODES: usize = 4096;

fuzz_target!(|methods: Vec<SetMethod>| {
    let config = Config::new(2).with_max_nodes(MAX_NODES);
    let mut set = TreeSet::with_config(config, rbset::keys::natural_order::<u16>()).unwrap();
    let mut bt_set = BTreeSet::<u16>::new();

    for m_c in methods.chunks(1024) {
        for m in m_c {
            match m {
                SetMethod::Insert { key } => {
                    let result = set.insert(&encode(*key));
                    if bt_set.len() >= MAX_NODES && !bt_set.contains(key) {
                        assert_eq!(result, Err(TreeSetError::CapacityExceeded { limit: MAX_NODES }));
                    } else {
                        assert_eq!(result, Ok(bt_set.insert(*key)));
                    }
                }
                SetMethod::Remove { key } => {
                    assert_eq!(set.remove(&encode(*key)), Ok(bt_set.remove(key)));
                }
                SetMethod::Erase { key } => match set.find(&encode(*key)) {
                    Some(handle) => {
                        assert_eq!(set.erase(handle), Ok(()));
                        assert!(bt_set.remove(key));
                    }
                    None => assert!(!bt_set.contains(key)),
                },
                SetMethod::Find { key } => {
                    let found = set.find(&encode(*key)).and_then(|h| set.get(h)).and_then(decode::<u16>);
                    assert_eq!(found, bt_set.get(key).copied());
                }
                SetMethod::LowerBound { key } => {
                    let found = set
                        .lower_bound(&encode(*key))
                        .and_then(|h| set.get(h))
                        .and_then(decode::<u16>);
                    assert_eq!(found, bt_set.range(*key..).next().copied());
                }
                SetMethod::Clear => {
                    set.clear();
                    bt_set.clear();
                }
            }
        }
        if let Err(e) = set.validate() {
            set.print_tree();
            panic!("invariant broken: {e}");
        }
    }

    let got: Vec<u16> = set.iter().filter_map(|(_, d)| decode::<u16>(d)).collect();
    let expected: Vec<u16> = bt_set.iter().copied().collect();
    assert_eq!(got, expected);
});
