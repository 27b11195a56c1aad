//! Capacity Tracker Module
//!
//! Counts live entries against the configured maximum.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::{CacheError, Result};

// == Capacity Tracker ==
/// Lock-free live-entry counter.
///
/// The count is advisory: under concurrent put/remove it may briefly lead or
/// trail the real map size, and may even dip below zero, but every increment
/// is paired with exactly one decrement so it settles back.
#[derive(Debug)]
pub struct CapacityTracker {
    max_entries: i64,
    current: AtomicI64,
}

impl CapacityTracker {
    /// # Errors
    /// `InvalidConfig` if `max_entries` is zero or does not fit the counter.
    pub fn new(max_entries: usize) -> Result<Self> {
        if max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be positive".to_string(),
            ));
        }
        let max_entries = i64::try_from(max_entries).map_err(|_| {
            CacheError::InvalidConfig(format!("max_entries must not exceed {}", i64::MAX))
        })?;
        Ok(Self {
            max_entries,
            current: AtomicI64::new(0),
        })
    }

    pub fn increment(&self) {
        self.current.fetch_add(1, Ordering::AcqRel);
    }

    pub fn decrement(&self) {
        self.current.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn is_over_limit(&self) -> bool {
        self.current() > self.max_entries
    }

    pub fn current(&self) -> i64 {
        self.current.load(Ordering::Acquire)
    }

    pub fn max_entries(&self) -> usize {
        // Checked against i64::MAX on construction
        self.max_entries as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            CapacityTracker::new(0),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_oversized_capacity_rejected() {
        assert!(matches!(
            CapacityTracker::new(usize::MAX),
            Err(CacheError::InvalidConfig(_))
        ));

        let largest = CapacityTracker::new(i64::MAX as usize).unwrap();
        largest.increment();
        assert!(!largest.is_over_limit());
        assert_eq!(largest.max_entries(), i64::MAX as usize);
    }

    #[test]
    fn test_limit_is_exclusive() {
        let tracker = CapacityTracker::new(2).unwrap();

        tracker.increment();
        tracker.increment();
        assert!(!tracker.is_over_limit());

        tracker.increment();
        assert!(tracker.is_over_limit());

        tracker.decrement();
        assert!(!tracker.is_over_limit());
        assert_eq!(tracker.current(), 2);
    }

    #[test]
    fn test_concurrent_pairs_settle_to_zero() {
        use std::sync::Arc;
        use std::thread;

        let tracker = Arc::new(CapacityTracker::new(10).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        tracker.increment();
                        tracker.decrement();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.current(), 0);
    }
}
