//! Storage Engine Module
//!
//! Concurrency-safe key to entry map. Knows nothing about TTL or capacity.

use std::sync::Arc;

use dashmap::DashMap;

use crate::cache::Entry;

// == Storage Engine ==
/// Sharded map from key to the current entry.
///
/// Locking is per shard, so there is no lock across the whole map.
/// `remove_if_matches` is the only removal that expiration and eviction
/// are allowed to use.
#[derive(Debug, Default)]
pub struct StorageEngine {
    entries: DashMap<String, Arc<Entry>>,
}

impl StorageEngine {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    // == Put ==
    /// Inserts or unconditionally replaces the entry for `key`.
    ///
    /// Returns the entry that was replaced, observed atomically with the insert.
    pub fn put(&self, key: String, entry: Arc<Entry>) -> Option<Arc<Entry>> {
        self.entries.insert(key, entry)
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<Arc<Entry>> {
        self.entries.get(key).map(|e| Arc::clone(e.value()))
    }

    // == Remove ==
    /// Removes the entry for `key` unconditionally.
    pub fn remove(&self, key: &str) -> Option<Arc<Entry>> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    // == Remove If Matches ==
    /// Removes the entry only if it is still the exact entry `expected`.
    ///
    /// Returns false when the key is gone or has been replaced since
    /// `expected` was read.
    pub fn remove_if_matches(&self, key: &str, expected: &Arc<Entry>) -> bool {
        self.entries
            .remove_if(key, |_, current| Arc::ptr_eq(current, expected))
            .is_some()
    }

    // == Scan ==
    /// Returns a point-in-time copy of all (key, entry) pairs.
    ///
    /// Shard locks are released before the snapshot is returned, so callers
    /// may mutate the engine while walking it.
    pub fn scan(&self) -> Vec<(String, Arc<Entry>)> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, value: &str) -> Arc<Entry> {
        Arc::new(Entry::new(key, value, None).unwrap())
    }

    #[test]
    fn test_put_and_get() {
        let storage = StorageEngine::new();

        assert!(storage.put("a".to_string(), entry("a", "1")).is_none());
        assert_eq!(storage.get("a").unwrap().value(), "1");
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_put_returns_previous() {
        let storage = StorageEngine::new();
        let first = entry("a", "1");

        storage.put("a".to_string(), Arc::clone(&first));
        let previous = storage.put("a".to_string(), entry("a", "2")).unwrap();

        assert!(Arc::ptr_eq(&previous, &first));
        assert_eq!(storage.get("a").unwrap().value(), "2");
    }

    #[test]
    fn test_remove_unconditional() {
        let storage = StorageEngine::new();
        storage.put("a".to_string(), entry("a", "1"));

        assert!(storage.remove("a").is_some());
        assert!(storage.remove("a").is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_remove_if_matches_same_entry() {
        let storage = StorageEngine::new();
        let stored = entry("a", "1");
        storage.put("a".to_string(), Arc::clone(&stored));

        assert!(storage.remove_if_matches("a", &stored));
        assert!(storage.get("a").is_none());
    }

    #[test]
    fn test_remove_if_matches_replaced_entry_survives() {
        let storage = StorageEngine::new();
        let old = entry("a", "1");
        storage.put("a".to_string(), Arc::clone(&old));
        storage.put("a".to_string(), entry("a", "1"));

        // Equal content, different entry: the newer write must survive
        assert!(!storage.remove_if_matches("a", &old));
        assert_eq!(storage.get("a").unwrap().value(), "1");
    }

    #[test]
    fn test_remove_if_matches_absent_key() {
        let storage = StorageEngine::new();
        assert!(!storage.remove_if_matches("missing", &entry("missing", "x")));
    }

    #[test]
    fn test_scan_is_a_snapshot() {
        let storage = StorageEngine::new();
        storage.put("a".to_string(), entry("a", "1"));
        storage.put("b".to_string(), entry("b", "2"));

        let snapshot = storage.scan();
        assert_eq!(snapshot.len(), 2);

        // Mutating while holding the snapshot must not deadlock
        for (key, stored) in &snapshot {
            assert!(storage.remove_if_matches(key, stored));
        }
        assert!(storage.is_empty());
    }
}
