//! TTL Reaper Task
//!
//! Background task that periodically removes expired entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::{
    forget_removed, CapacityTracker, EvictionPolicy, ExpirationPolicy, StatsRecorder,
    StorageEngine,
};
use crate::clock::Clock;
use crate::error::{CacheError, Result};

/// The parts of the store the reaper needs, shared with the facade.
#[derive(Clone)]
pub struct ReaperContext {
    pub storage: Arc<StorageEngine>,
    pub expiration: Arc<dyn ExpirationPolicy>,
    pub eviction: Arc<dyn EvictionPolicy>,
    pub tracker: Arc<CapacityTracker>,
    pub stats: Arc<StatsRecorder>,
    pub clock: Arc<dyn Clock>,
}

impl ReaperContext {
    /// Runs one cleanup pass over a snapshot of storage.
    ///
    /// Every removal goes through `remove_if_matches`, so an entry that was
    /// overwritten after the snapshot was taken is left alone. Returns the
    /// number of entries this pass actually removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        for (key, entry) in self.storage.scan() {
            if self.expiration.is_expired(&entry, now)
                && self.storage.remove_if_matches(&key, &entry)
            {
                self.tracker.decrement();
                self.stats.record_expiration();
                forget_removed(self.eviction.as_ref(), &self.storage, &key);
                removed += 1;
            }
        }

        removed
    }
}

// == Reaper ==
/// Handle to the running background reaper.
///
/// Dropping the handle closes the stop channel, which also ends the task.
pub struct Reaper {
    handle: JoinHandle<()>,
    stop_tx: watch::Sender<bool>,
}

impl Reaper {
    /// Spawns the reaper on the current tokio runtime.
    ///
    /// The first sweep runs one `interval` after spawning.
    ///
    /// # Errors
    /// - `InvalidConfig` if `interval` is zero
    /// - `Runtime` if called outside a tokio runtime
    pub fn spawn(context: ReaperContext, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "cleanup interval must be positive".to_string(),
            ));
        }
        let runtime = Handle::try_current().map_err(|e| CacheError::Runtime(e.to_string()))?;
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = runtime.spawn(async move {
            info!(
                "Starting TTL reaper with interval of {} ms",
                interval.as_millis()
            );

            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    // Fires on an explicit stop and when the handle is dropped
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        let removed = context.sweep();
                        if removed > 0 {
                            info!("TTL reaper: removed {} expired entries", removed);
                        } else {
                            debug!("TTL reaper: no expired entries found");
                        }
                    }
                }
            }

            info!("TTL reaper stopped");
        });

        Ok(Self { handle, stop_tx })
    }

    /// Signals the task to stop and waits up to `grace` for it to exit.
    ///
    /// A sweep already in progress is allowed to finish. If the task is still
    /// running when the grace period ends it is aborted. Returns true on a
    /// clean exit.
    pub async fn stop(self, grace: Duration) -> bool {
        let Reaper {
            mut handle,
            stop_tx,
        } = self;

        // Fails only if the task already exited and dropped its receiver
        let _ = stop_tx.send(true);

        match tokio::time::timeout(grace, &mut handle).await {
            Ok(_) => true,
            Err(_) => {
                warn!(
                    "TTL reaper did not stop within {} ms, aborting",
                    grace.as_millis()
                );
                handle.abort();
                false
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
