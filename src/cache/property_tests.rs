//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store behaviour over generated keys, values and
//! operation sequences. Time is driven by a `ManualClock`.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::KvStore;
use crate::clock::ManualClock;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const REAPER_INTERVAL: Duration = Duration::from_secs(3600);

// == Strategies ==
/// Generates valid cache keys (non-blank, within length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates cache values, including empty ones
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,256}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: String },
    PutTtl { key: String, value: String, ttl_ms: i64 },
    Get { key: String },
    Advance { ms: i64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // A small key space so operations collide
    let key = "[a-e]";
    prop_oneof![
        (key, valid_value_strategy()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        (key, valid_value_strategy(), -10i64..50)
            .prop_map(|(key, value, ttl_ms)| CacheOp::PutTtl { key, value, ttl_ms }),
        key.prop_map(|key| CacheOp::Get { key }),
        (0i64..30).prop_map(|ms| CacheOp::Advance { ms }),
    ]
}

fn new_store(max_entries: usize) -> (KvStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let store = KvStore::new(max_entries, REAPER_INTERVAL, clock.clone()).unwrap();
    (store, clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A key that was never put always misses
    #[test]
    fn prop_never_put_misses(
        stored in prop::collection::vec(valid_key_strategy(), 0..20),
        absent_key in valid_key_strategy()
    ) {
        prop_assume!(!stored.contains(&absent_key));
        tokio_test::block_on(async {
            let (store, _) = new_store(TEST_MAX_ENTRIES);
            for key in &stored {
                store.put(key.clone(), "v").unwrap();
            }
            prop_assert_eq!(store.get(&absent_key), None);
            Ok(())
        })?;
    }

    // Storing then retrieving before expiry returns the exact value
    #[test]
    fn prop_roundtrip_storage(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl_ms in 1i64..1_000_000
    ) {
        tokio_test::block_on(async {
            let (store, clock) = new_store(TEST_MAX_ENTRIES);

            store.put(key.clone(), value.clone()).unwrap();
            prop_assert_eq!(store.get(&key), Some(value.clone()));

            store.put_with_ttl(key.clone(), value.clone(), ttl_ms).unwrap();
            clock.advance(ttl_ms - 1);
            prop_assert_eq!(store.get(&key), Some(value));
            Ok(())
        })?;
    }

    // A non-positive TTL is an immediate expiry
    #[test]
    fn prop_non_positive_ttl_misses(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl_ms in i64::MIN..=0
    ) {
        tokio_test::block_on(async {
            let (store, _) = new_store(TEST_MAX_ENTRIES);
            store.put_with_ttl(key.clone(), value, ttl_ms).unwrap();
            prop_assert_eq!(store.get(&key), None);
            prop_assert_eq!(store.stats().total_entries, 0);
            Ok(())
        })?;
    }

    // Overwriting a key returns the newest value and counts the key once
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        tokio_test::block_on(async {
            let (store, _) = new_store(TEST_MAX_ENTRIES);

            store.put(key.clone(), value1).unwrap();
            store.put(key.clone(), value2.clone()).unwrap();

            prop_assert_eq!(store.get(&key), Some(value2));
            prop_assert_eq!(store.len(), 1);
            prop_assert_eq!(store.stats().total_entries, 1);
            Ok(())
        })?;
    }

    // Single-threaded, the store never holds more than its limit after a put
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        )
    ) {
        tokio_test::block_on(async {
            let max_entries = 50;
            let (store, _) = new_store(max_entries);

            for (key, value) in entries {
                store.put(key, value).unwrap();
                prop_assert!(
                    store.len() <= max_entries,
                    "Store size {} exceeds max {}",
                    store.len(),
                    max_entries
                );
            }
            Ok(())
        })?;
    }

    // Filling to capacity and adding one more evicts exactly the oldest key
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(valid_key_strategy(), 2..10),
        new_key in valid_key_strategy()
    ) {
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();
        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        tokio_test::block_on(async {
            let capacity = unique_keys.len();
            let (store, _) = new_store(capacity);

            for key in &unique_keys {
                store.put(key.clone(), format!("value_{}", key)).unwrap();
            }
            store.put(new_key.clone(), "new").unwrap();

            prop_assert_eq!(store.len(), capacity);
            prop_assert_eq!(store.get(&unique_keys[0]), None);
            prop_assert!(store.get(&new_key).is_some());
            for key in unique_keys.iter().skip(1) {
                prop_assert!(store.get(key).is_some(), "Key '{}' should survive", key);
            }
            Ok(())
        })?;
    }

    // A GET moves a key out of the eviction front line
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(valid_key_strategy(), 3..8),
        new_key in valid_key_strategy()
    ) {
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = keys
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();
        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        tokio_test::block_on(async {
            let (store, _) = new_store(unique_keys.len());

            for key in &unique_keys {
                store.put(key.clone(), "v").unwrap();
            }
            let accessed_key = &unique_keys[0];
            prop_assert!(store.get(accessed_key).is_some());

            store.put(new_key.clone(), "v").unwrap();

            prop_assert!(store.get(accessed_key).is_some());
            prop_assert_eq!(store.get(&unique_keys[1]), None);
            prop_assert!(store.get(&new_key).is_some());
            Ok(())
        })?;
    }

    // Across mixed puts, TTL puts, reads and clock moves, the counter always
    // matches storage once the store has been purged
    #[test]
    fn prop_counter_matches_storage(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        tokio_test::block_on(async {
            let (store, clock) = new_store(3);

            for op in ops {
                match op {
                    CacheOp::Put { key, value } => store.put(key, value).unwrap(),
                    CacheOp::PutTtl { key, value, ttl_ms } => {
                        store.put_with_ttl(key, value, ttl_ms).unwrap()
                    }
                    CacheOp::Get { key } => {
                        let _ = store.get(&key);
                    }
                    CacheOp::Advance { ms } => clock.advance(ms),
                }
                prop_assert!(store.len() <= 3);
                prop_assert_eq!(store.stats().total_entries, store.len());
            }

            store.purge_expired();
            prop_assert_eq!(store.stats().total_entries, store.len());
            Ok(())
        })?;
    }
}
