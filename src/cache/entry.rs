//! Cache Entry Module
//!
//! Defines the immutable record stored for each key.

use crate::cache::{MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, Result};

// == Entry ==
/// A single key-value record with an optional absolute expiry.
///
/// Entries are never mutated after construction; an update replaces the
/// whole entry. Storage hands them out as `Arc<Entry>` so that removals can
/// compare by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    value: String,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    expires_at: Option<i64>,
}

impl Entry {
    // == Constructor ==
    /// Creates a validated entry.
    ///
    /// # Errors
    /// - `InvalidKey` if the key is empty, blank or longer than `MAX_KEY_LENGTH`
    /// - `InvalidValue` if the value is larger than `MAX_VALUE_SIZE`
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        expires_at: Option<i64>,
    ) -> Result<Self> {
        let key = key.into();
        let value = value.into();

        if key.trim().is_empty() {
            return Err(CacheError::InvalidKey(
                "Key must not be empty or blank".to_string(),
            ));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidValue(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        Ok(Self {
            key,
            value,
            expires_at,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    pub fn has_expiry(&self) -> bool {
        self.expires_at.is_some()
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds at `now`, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the TTL has elapsed
    /// - `Some(remaining_ms)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining_ms(&self, now: i64) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(now).max(0) as u64)
    }
}
