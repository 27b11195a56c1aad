//! Expiration Policy Module
//!
//! Decides whether an entry has outlived its TTL.

use crate::cache::Entry;

/// Pure expiry predicate. Implementations must not keep state.
pub trait ExpirationPolicy: Send + Sync {
    fn is_expired(&self, entry: &Entry, now: i64) -> bool;
}

// == TTL Expiration ==
/// Default policy: entries without an expiry never expire, the rest expire
/// once `now >= expires_at`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TtlExpiration;

impl ExpirationPolicy for TtlExpiration {
    fn is_expired(&self, entry: &Entry, now: i64) -> bool {
        match entry.expires_at() {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
