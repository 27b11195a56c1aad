//! Eviction Policy Module
//!
//! Approximate Least Recently Used tracking for capacity eviction.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::cache::StorageEngine;

/// Chooses which key to evict when the store is over capacity.
///
/// Policies only track keys. They never remove entries, know nothing about
/// TTL, and their answers are hints: a returned key may already be gone from
/// storage and must be re-validated by the caller.
pub trait EvictionPolicy: Send + Sync {
    /// Records that `key` was just read or written.
    fn on_access(&self, key: &str);

    /// Pops the next eviction candidate, or None when nothing is tracked.
    fn select_candidate(&self) -> Option<String>;

    /// Stops tracking `key` after the store removed it.
    fn on_remove(&self, _key: &str) {}
}

/// Drops the hint for a key the caller just removed from `storage`.
///
/// A writer may have put the key back between the removal and this call. If
/// storage holds it again the hint is restored, so a live key is never left
/// untracked.
pub(crate) fn forget_removed(policy: &dyn EvictionPolicy, storage: &StorageEngine, key: &str) {
    policy.on_remove(key);
    if storage.get(key).is_some() {
        policy.on_access(key);
    }
}

// == LRU Eviction ==
/// Tracks access order for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Each key appears at most once. The store forgets keys it removes, but a
/// key dropped by a racing writer can linger until it is popped, so
/// candidates must still be checked against storage.
#[derive(Debug, Default)]
pub struct LruEviction {
    order: Mutex<VecDeque<String>>,
}

impl LruEviction {
    pub fn new() -> Self {
        Self {
            order: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of tracked keys, stale ones included.
    pub fn len(&self) -> usize {
        self.order.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.lock().is_empty()
    }
}

impl EvictionPolicy for LruEviction {
    fn on_access(&self, key: &str) {
        let mut order = self.order.lock();
        order.retain(|k| k != key);
        order.push_front(key.to_string());
    }

    fn select_candidate(&self) -> Option<String> {
        self.order.lock().pop_back()
    }

    fn on_remove(&self, key: &str) {
        self.order.lock().retain(|k| k != key);
    }
}
