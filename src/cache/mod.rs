//! Cache Module
//!
//! In-memory key-value storage with TTL expiration and approximate LRU
//! eviction against an entry-count limit.

mod capacity;
mod entry;
mod eviction;
mod expiration;
mod stats;
mod storage;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use capacity::CapacityTracker;
pub use entry::Entry;
pub use eviction::{EvictionPolicy, LruEviction};
pub(crate) use eviction::forget_removed;
pub use expiration::{ExpirationPolicy, TtlExpiration};
pub use stats::{CacheStats, StatsRecorder};
pub use storage::StorageEngine;
pub use store::{KvStore, DEFAULT_SHUTDOWN_GRACE};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
