//! Cache Store Module
//!
//! `KvStore` composes storage, the expiration and eviction policies, the
//! capacity tracker and the background reaper.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{
    forget_removed, CacheStats, CapacityTracker, Entry, EvictionPolicy, ExpirationPolicy,
    LruEviction, StatsRecorder, StorageEngine, TtlExpiration,
};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::{Reaper, ReaperContext};

/// Grace period `shutdown` gives the reaper before aborting it.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

// == KV Store ==
/// Concurrent key-value store with TTL expiration and approximate LRU
/// eviction.
///
/// All methods take `&self`; share the store between threads with `Arc`.
/// Storage is the only source of truth. The recency list and the entry
/// counter are bookkeeping and may briefly disagree with it.
pub struct KvStore {
    storage: Arc<StorageEngine>,
    expiration: Arc<dyn ExpirationPolicy>,
    eviction: Arc<dyn EvictionPolicy>,
    tracker: Arc<CapacityTracker>,
    stats: Arc<StatsRecorder>,
    clock: Arc<dyn Clock>,
    reaper: Mutex<Option<Reaper>>,
    shutdown_grace: Duration,
}

impl KvStore {
    // == Constructors ==
    /// Creates a store with TTL expiration and LRU eviction.
    ///
    /// Must be called from within a tokio runtime, which hosts the reaper.
    ///
    /// # Errors
    /// - `InvalidConfig` if `max_entries` or `cleanup_interval` is zero
    /// - `Runtime` if no tokio runtime is running
    pub fn new(
        max_entries: usize,
        cleanup_interval: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        Self::with_policies(
            max_entries,
            cleanup_interval,
            clock,
            Arc::new(TtlExpiration),
            Arc::new(LruEviction::new()),
        )
    }

    /// Creates a store with caller-supplied policies.
    pub fn with_policies(
        max_entries: usize,
        cleanup_interval: Duration,
        clock: Arc<dyn Clock>,
        expiration: Arc<dyn ExpirationPolicy>,
        eviction: Arc<dyn EvictionPolicy>,
    ) -> Result<Self> {
        let tracker = Arc::new(CapacityTracker::new(max_entries)?);
        let storage = Arc::new(StorageEngine::new());
        let stats = Arc::new(StatsRecorder::new());

        let context = ReaperContext {
            storage: Arc::clone(&storage),
            expiration: Arc::clone(&expiration),
            eviction: Arc::clone(&eviction),
            tracker: Arc::clone(&tracker),
            stats: Arc::clone(&stats),
            clock: Arc::clone(&clock),
        };
        let reaper = Reaper::spawn(context, cleanup_interval)?;

        Ok(Self {
            storage,
            expiration,
            eviction,
            tracker,
            stats,
            clock,
            reaper: Mutex::new(Some(reaper)),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        })
    }

    /// Creates a store from configuration, using the system clock.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = Self::new(
            config.max_entries,
            config.cleanup_interval(),
            Arc::new(SystemClock),
        )?;
        Ok(store.with_shutdown_grace(config.shutdown_grace()))
    }

    /// Overrides how long `shutdown` waits for the reaper.
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    // == Put ==
    /// Stores a value that never expires.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.insert(key.into(), value.into(), None)
    }

    /// Stores a value that expires `ttl_ms` milliseconds from now.
    ///
    /// A non-positive TTL expires the entry immediately, so the next `get`
    /// misses. This can be used to tombstone a key.
    pub fn put_with_ttl(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        ttl_ms: i64,
    ) -> Result<()> {
        let now = self.clock.now();
        let expires_at = if ttl_ms <= 0 {
            now
        } else {
            now.saturating_add(ttl_ms)
        };
        self.insert(key.into(), value.into(), Some(expires_at))
    }

    fn insert(&self, key: String, value: String, expires_at: Option<i64>) -> Result<()> {
        let entry = Arc::new(Entry::new(key.clone(), value, expires_at)?);

        // Last write wins; the returned previous entry tells us if the key is new
        if self.storage.put(key.clone(), entry).is_none() {
            self.tracker.increment();
        }

        self.eviction.on_access(&key);
        self.evict_if_needed();
        Ok(())
    }

    // == Get ==
    /// Returns the value for `key`, or None if it is absent or expired.
    ///
    /// An expired entry is removed on the spot unless a concurrent writer or
    /// the reaper got to it first. The caller sees a miss either way.
    pub fn get(&self, key: &str) -> Option<String> {
        let Some(entry) = self.storage.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if self.expiration.is_expired(&entry, self.clock.now()) {
            if self.storage.remove_if_matches(key, &entry) {
                self.tracker.decrement();
                self.stats.record_expiration();
                self.forget(key);
            }
            self.stats.record_miss();
            return None;
        }

        self.eviction.on_access(key);
        self.stats.record_hit();
        Some(entry.value().to_string())
    }

    // == Delete ==
    /// Removes `key` unconditionally. Returns true if an entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        if self.storage.remove(key).is_some() {
            self.tracker.decrement();
            self.forget(key);
            true
        } else {
            false
        }
    }

    // == Eviction ==
    fn forget(&self, key: &str) {
        forget_removed(self.eviction.as_ref(), &self.storage, key);
    }

    fn evict_if_needed(&self) {
        while self.tracker.is_over_limit() {
            let Some(candidate) = self.eviction.select_candidate() else {
                warn!(
                    "Eviction exhausted: {} entries tracked against a limit of {}",
                    self.tracker.current(),
                    self.tracker.max_entries()
                );
                return;
            };

            // Hints can be stale; storage decides
            let Some(entry) = self.storage.get(&candidate) else {
                continue;
            };

            if self.storage.remove_if_matches(&candidate, &entry) {
                self.tracker.decrement();
                self.stats.record_eviction();
                debug!("Evicted least recently used key '{}'", candidate);
            }
        }
    }

    // == Purge Expired ==
    /// Runs one reaper pass immediately. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.reaper_context().sweep()
    }

    fn reaper_context(&self) -> ReaperContext {
        ReaperContext {
            storage: Arc::clone(&self.storage),
            expiration: Arc::clone(&self.expiration),
            eviction: Arc::clone(&self.eviction),
            tracker: Arc::clone(&self.tracker),
            stats: Arc::clone(&self.stats),
            clock: Arc::clone(&self.clock),
        }
    }

    // == Shutdown ==
    /// Stops the background reaper.
    ///
    /// Only background cleanup stops; the store stays usable and expired
    /// entries are still removed lazily on `get`. Calling this again is a
    /// no-op.
    pub async fn shutdown(&self) {
        let reaper = self.reaper.lock().take();
        match reaper {
            Some(reaper) => {
                if reaper.stop(self.shutdown_grace).await {
                    info!("Reaper shut down cleanly");
                }
            }
            None => debug!("Shutdown requested but the reaper is already stopped"),
        }
    }

    /// True until `shutdown` has been called and the reaper has exited.
    pub fn is_reaper_running(&self) -> bool {
        self.reaper
            .lock()
            .as_ref()
            .map_or(false, |reaper| !reaper.is_finished())
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let total = self.tracker.current().max(0) as usize;
        self.stats.snapshot(total)
    }

    /// Number of entries physically in storage, expired ones included.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.tracker.max_entries()
    }
}
