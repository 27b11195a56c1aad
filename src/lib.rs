//! Mini KV - An in-process key-value cache
//!
//! Concurrent storage with per-entry TTL expiration, a background reaper and
//! approximate LRU eviction against an entry-count limit. Ships with an HTTP
//! API and a line-oriented console as thin front ends.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStats, KvStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{CacheError, Result};
