//! Off-thread execution with a per-task deadline.
//!
//! [`TaskExecutor`] runs work units on a fixed-size [`rayon`] pool and
//! attaches an independent Tokio timer to each one. The timer is the only
//! writer of the task's outcome: it waits for the worker's report on a
//! oneshot channel and resolves the record with whichever comes first, the
//! report or the deadline. A worker that finishes after the deadline finds
//! the channel closed and its value is dropped.
//!
//! Work units are never interrupted. A timed-out unit keeps its worker thread
//! until it returns on its own.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::config::{duration_ms, TaskConfig};
use crate::domain::{Outcome, TaskRecord};
use crate::error::{ManagerError, TaskFailure};

/// Runs work units off the caller's thread and resolves their records.
#[derive(Debug)]
pub struct TaskExecutor {
    pool: ThreadPool,
    runtime: Handle,
    timeout: Duration,
}

impl TaskExecutor {
    /// Builds the worker pool described by `config`; deadlines are scheduled
    /// on `runtime`.
    pub fn new(config: &TaskConfig, runtime: Handle) -> Result<Self, ManagerError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|index| format!("raceapp-task-{index}"))
            .build()?;

        Ok(Self {
            pool,
            runtime,
            timeout: config.task_timeout(),
        })
    }

    /// The per-task deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of worker threads in the pool.
    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Schedules `work` and returns immediately.
    ///
    /// The record is resolved later with the work's value, its error, a panic
    /// report, or a timeout, whichever the deadline timer observes first.
    pub fn execute<T, E, F>(&self, record: Arc<TaskRecord<T, E>>, work: F)
    where
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        let (report_tx, report_rx) = oneshot::channel::<Outcome<T, E>>();

        self.pool.spawn(move || {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(work)) {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(cause)) => Err(TaskFailure::Work(cause)),
                Err(payload) => Err(TaskFailure::Aborted(panic_message(payload.as_ref()))),
            };
            // The receiver is gone once the deadline has fired.
            let _ = report_tx.send(outcome);
        });

        let timeout = self.timeout;
        self.runtime.spawn(async move {
            let task_id = record.id().clone();
            let outcome = match tokio::time::timeout(timeout, report_rx).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(_)) => Err(TaskFailure::Aborted(
                    "worker exited without reporting".to_string(),
                )),
                Err(_) => {
                    tracing::warn!(
                        task_id = %task_id,
                        timeout_ms = duration_ms(timeout),
                        "Task exceeded its deadline"
                    );
                    Err(TaskFailure::TimedOut { timeout })
                },
            };

            match &outcome {
                Ok(_) => tracing::debug!(task_id = %task_id, "Task completed"),
                Err(TaskFailure::Aborted(reason)) => {
                    tracing::warn!(task_id = %task_id, reason = %reason, "Task worker aborted");
                },
                Err(_) => tracing::debug!(task_id = %task_id, "Task failed"),
            }

            record.resolve(outcome);
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
