//! Property-Based Tests for Cache Module

use proptest::prelude::*;
use std::time::Duration;

use crate::cache::{list_cache_key, CacheStore};
use crate::query::FilterParams;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_TTL: Duration = Duration::from_secs(3600);
const NS: &str = "property-list";

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

fn filter_pairs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-zA-Z]{1,10}", "[a-zA-Z0-9:,]{0,10}", 0..10)
        .prop_map(|m| m.into_iter().collect())
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Invalidate,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        Just(CacheOp::Invalidate),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Any permutation of the same filter pairs derives the same cache key.
    #[test]
    fn prop_key_is_permutation_invariant(
        (pairs, shuffled) in filter_pairs_strategy()
            .prop_flat_map(|pairs| (Just(pairs.clone()), Just(pairs).prop_shuffle()))
    ) {
        let a: FilterParams = pairs.into_iter().collect();
        let b: FilterParams = shuffled.into_iter().collect();
        prop_assert_eq!(list_cache_key(&a), list_cache_key(&b));
    }

    // Hit and miss counters match what callers observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let _ = store.set(NS, &key, value, TEST_TTL);
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Invalidate => {
                    store.invalidate_namespace(NS);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // After invalidation no key of the namespace is readable, whatever was written before.
    #[test]
    fn prop_invalidation_clears_namespace(
        entries in prop::collection::vec((valid_key_strategy(), valid_value_strategy()), 1..40)
    ) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        for (key, value) in &entries {
            store.set(NS, key, value.clone(), TEST_TTL).unwrap();
        }

        store.invalidate_namespace(NS);

        for (key, _) in &entries {
            prop_assert!(store.get(key).is_none(), "Key '{}' survived invalidation", key);
        }
        prop_assert_eq!(store.namespace_len(NS), 0);
        prop_assert!(store.is_empty());
    }

    // The entry count never exceeds capacity, and the registry never outgrows the entries.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((valid_key_strategy(), valid_value_strategy()), 1..200)
    ) {
        let max_entries = 50;
        let mut store = CacheStore::new(max_entries);

        for (key, value) in entries {
            let _ = store.set(NS, &key, value, TEST_TTL);
            prop_assert!(store.len() <= max_entries, "Cache size {} exceeds max {}", store.len(), max_entries);
            prop_assert_eq!(store.namespace_len(NS), store.len());
        }
    }
}
