//! Configuration Module
//!
//! Handles loading and validating store and server configuration from
//! environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Store and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of live entries before eviction kicks in
    pub max_entries: usize,
    /// Background reaper interval in milliseconds
    pub cleanup_interval_ms: u64,
    /// How long shutdown waits for the reaper before aborting it, in milliseconds
    pub shutdown_grace_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum live entries (default: 1000)
    /// - `CLEANUP_INTERVAL_MS` - Reaper frequency in milliseconds (default: 5000)
    /// - `SHUTDOWN_GRACE_MS` - Reaper shutdown grace period (default: 5000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            cleanup_interval_ms: env_or("CLEANUP_INTERVAL_MS", defaults.cleanup_interval_ms),
            shutdown_grace_ms: env_or("SHUTDOWN_GRACE_MS", defaults.shutdown_grace_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Rejects values the store cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be positive".to_string(),
            ));
        }
        if self.cleanup_interval_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "cleanup_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            cleanup_interval_ms: 5000,
            shutdown_grace_ms: 5000,
            server_port: 3000,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
