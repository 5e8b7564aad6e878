#![no_main]

use std::collections::BTreeSet;
use std::ops::Bound;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rbset::keys::{decode, encode, Encoded};
use rbset::TreeSet;

#[derive(Arbitrary, Debug)]
struct Input {
    keys: Vec<u32>,
    removals: Vec<u32>,
    start: Option<(u32, bool)>,
    end: Option<(u32, bool)>,
}

fn bound(b: Option<(u32, bool)>) -> Bound<u32> {
    match b {
        None => Bound::Unbounded,
        Some((k, true)) => Bound::Included(k),
        Some((k, false)) => Bound::Excluded(k),
    }
}

fuzz_target!(|input: Input| {
    let mut set = TreeSet::for_numbers::<u32>();
    let mut bt_set = BTreeSet::<u32>::new();
    for k in &input.keys {
        set.insert(&encode(*k)).unwrap();
        bt_set.insert(*k);
    }
    for k in &input.removals {
        set.remove(&encode(*k)).unwrap();
        bt_set.remove(k);
    }

    let (start, end) = (bound(input.start), bound(input.end));
    // BTreeSet::range panics on inverted or empty-excluded ranges; the set just yields nothing.
    let inverted = match (start, end) {
        (Bound::Included(s), Bound::Included(e)) => s > e,
        (Bound::Included(s), Bound::Excluded(e))
        | (Bound::Excluded(s), Bound::Included(e)) => s > e,
        (Bound::Excluded(s), Bound::Excluded(e)) => s >= e,
        _ => false,
    };

    let (sb, eb) = (input.start.map(|(k, _)| encode(k)), input.end.map(|(k, _)| encode(k)));
    let as_bytes = |b: Bound<u32>, bytes: &Option<Encoded>| -> Bound<Vec<u8>> {
        match (b, bytes) {
            (Bound::Included(_), Some(x)) => Bound::Included(x.to_vec()),
            (Bound::Excluded(_), Some(x)) => Bound::Excluded(x.to_vec()),
            _ => Bound::Unbounded,
        }
    };
    let (sv, ev) = (as_bytes(start, &sb), as_bytes(end, &eb));
    let got: Vec<u32> = set
        .range(sv.as_ref().map(|v| v.as_slice()), ev.as_ref().map(|v| v.as_slice()))
        .filter_map(|(_, d)| decode::<u32>(d))
        .collect();

    if inverted {
        assert!(got.is_empty());
    } else {
        let expected: Vec<u32> = bt_set.range((start, end)).copied().collect();
        assert_eq!(got, expected);
    }
});
