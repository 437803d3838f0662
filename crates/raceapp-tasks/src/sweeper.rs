//! Recurring eviction of expired task records.
//!
//! [`ExpirySweeper`] owns one background Tokio task that wakes up every
//! `sweep_interval` and removes records older than the retention window from
//! the [`TaskRegistry`]. Removal is silent: callers holding an evicted
//! identifier simply see `NOT_FOUND` afterwards. Each scan runs on Tokio's
//! blocking pool.
//!
//! The first sweep happens one full interval after start, not immediately.
//! Dropping the sweeper (or calling [`ExpirySweeper::shutdown`]) stops the
//! background task.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::registry::TaskRegistry;

/// Handle to the background expiry task.
#[derive(Debug)]
pub struct ExpirySweeper {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ExpirySweeper {
    /// Starts sweeping `registry` on `runtime`.
    ///
    /// `interval` must be non-zero.
    pub fn spawn<T, E>(
        registry: Arc<TaskRegistry<T, E>>,
        interval: Duration,
        retention: Duration,
        runtime: &Handle,
    ) -> Self
    where
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {
                        // The scan takes shard write locks; keep it off the async workers.
                        let registry = Arc::clone(&registry);
                        let scan = task::spawn_blocking(move || sweep_once(&registry, retention));
                        if let Err(e) = scan.await {
                            tracing::warn!(error = %e, "Expiry sweep did not complete");
                        }
                    }
                }
            }

            tracing::debug!("Expiry sweeper stopped");
        });

        Self { cancel, handle }
    }

    /// Stops the background task. Idempotent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Runs one sweep cycle against the current time and returns the number of
/// records removed.
pub fn sweep_once<T, E>(registry: &TaskRegistry<T, E>, retention: Duration) -> usize {
    let removed = registry.remove_expired(Utc::now(), retention);
    if removed > 0 {
        tracing::info!(
            removed,
            remaining = registry.len(),
            "Evicted expired tasks"
        );
    } else {
        tracing::trace!(remaining = registry.len(), "No expired tasks to evict");
    }
    removed
}
