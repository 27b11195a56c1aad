//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Live entries according to the capacity counter
    pub total_entries: usize,
    /// Configured entry limit
    pub max_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, max_entries: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            max_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Whether the background reaper is still running
    pub reaper_running: bool,
}

impl HealthResponse {
    pub fn healthy(reaper_running: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            reaper_running,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
