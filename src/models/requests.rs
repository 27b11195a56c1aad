//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for the SET operation (PUT /set)
///
/// `key` and `value` are both required; a body without a value is rejected
/// by the JSON extractor before it reaches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional TTL in milliseconds; zero or negative expires immediately
    #[serde(default, alias = "ttl")]
    pub ttl_ms: Option<i64>,
}
