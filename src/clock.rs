//! Clock Module
//!
//! Time source for TTL decisions, expressed as Unix milliseconds.

use std::sync::atomic::{AtomicI64, Ordering};

/// Supplies the current time in milliseconds since the Unix epoch.
///
/// Implementations need not be monotonic, but TTL semantics assume the
/// returned value does not go backwards in practice.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

// == System Clock ==
/// Wall-clock time from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Used by tests and simulations to drive expiration deterministically.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at `start_ms`.
    pub fn new(start_ms: i64) -> Self {
        Self {
            millis: AtomicI64::new(start_ms),
        }
    }

    /// Moves the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: i64) {
        self.millis.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Sets the clock to an absolute value.
    pub fn set(&self, now_ms: i64) {
        self.millis.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}
