//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! TTL removals.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of the store's counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful lookups
    pub hits: u64,
    /// Number of failed lookups (key absent or expired)
    pub misses: u64,
    /// Number of entries removed by the eviction policy
    pub evictions: u64,
    /// Number of entries removed because their TTL elapsed
    pub expirations: u64,
    /// Live entries according to the capacity counter
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Shared atomic counters behind `CacheStats`.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters; `total_entries` is supplied by the caller.
    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            total_entries,
        }
    }
}
