use crate::error::{BuildError, InsertError};
use crate::hashtable::ElasticHashTable;
use crate::params::ElasticParams;
use crate::partition::Partition;
use crate::probe::phi;

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn validate_table(t: &ElasticHashTable) {
    assert!(t.len() <= t.max_items(), "items above the load ceiling");
    assert!(
        t.len() as f64 <= t.capacity() as f64 * (1.0 - t.delta()),
        "items above n·(1−δ)"
    );

    let occupied = t.iter().count();
    assert_eq!(occupied, t.len(), "item count must match occupied slots");

    let mut filled_total = 0;
    for subarray in t.subarrays() {
        let in_range = subarray
            .slots()
            .filter(|&slot| t.get_slot(slot).is_some())
            .count();
        assert_eq!(
            in_range,
            subarray.filled_slots(),
            "fill counter must match subarray contents"
        );
        filled_total += in_range;
    }
    assert_eq!(filled_total, t.len(), "keys outside the partition");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn partition_shape(capacity in 1usize..20_000, delta in 0.01f64..0.99) {
        let params = ElasticParams::new(capacity, delta);
        match Partition::build(&params) {
            Ok(partition) => {
                let beta = params.beta();
                prop_assert!(partition.len() >= 2);
                prop_assert!(partition.len() <= params.nominal_arrays());

                let mut start = 0;
                for subarray in partition.iter() {
                    prop_assert!(subarray.size() > 0);
                    prop_assert_eq!(subarray.size() % beta, 0);
                    prop_assert_eq!(subarray.start(), start);
                    start += subarray.size();
                }
                prop_assert!(start <= capacity);
            }
            Err(BuildError::TooFewSubarrays { built, .. }) => {
                prop_assert!(built < 2);
            }
            Err(BuildError::CeilingUnreachable { covered, max_items }) => {
                prop_assert!(covered < max_items);
                prop_assert_eq!(max_items, params.max_items());
            }
            Err(err) => {
                prop_assert!(false, "unexpected build error: {}", err);
            }
        }
    }

    #[test]
    fn phi_injective_in_j(i in 0usize..256, base in 0usize..(1 << 20)) {
        let values: HashSet<u64> = (base..base + 256).map(|j| phi(i, j)).collect();
        prop_assert_eq!(values.len(), 256);
    }

    #[test]
    fn placements_survive_later_inserts(
        capacity in 64usize..1024,
        delta in 0.05f64..0.6,
        keys in prop::collection::vec(any::<u64>(), 0..1200),
    ) {
        let mut t = match ElasticHashTable::new(capacity, delta) {
            Ok(t) => t,
            Err(BuildError::CeilingUnreachable { .. }) => return Ok(()),
            Err(err) => return Err(TestCaseError::fail(err.to_string())),
        };
        let mut placed = HashMap::new();

        for key in keys {
            match t.insert(key) {
                Ok(placement) => {
                    if let Some(previous) = placed.insert(key, placement) {
                        prop_assert_eq!(previous, placement, "re-insert moved key {}", key);
                    }
                }
                Err(InsertError::CapacityExceeded { items, max_items }) => {
                    prop_assert_eq!(items, max_items);
                }
                Err(err @ InsertError::ProbeExhausted { .. }) => {
                    prop_assert!(false, "{} at {} of {} keys", err, t.len(), t.max_items());
                }
            }
        }

        validate_table(&t);
        prop_assert_eq!(t.len(), placed.len());
        for (key, placement) in &placed {
            prop_assert_eq!(t.locate(*key), Some(*placement));
        }
    }

    #[test]
    fn search_never_mutates(
        keys in prop::collection::vec(1u64..10_000, 0..600),
        probes in prop::collection::vec(any::<u64>(), 1..200),
    ) {
        let mut t = ElasticHashTable::new(1024, 0.1).unwrap();
        for key in keys {
            let _ = t.insert(key);
        }

        let digest = t.layout_digest();
        let cursor = *t.cursor();
        for key in probes {
            let _ = t.search(key);
        }
        prop_assert!(digest.is_identical(&t.layout_digest()));
        prop_assert_eq!(cursor, *t.cursor());
    }
}
