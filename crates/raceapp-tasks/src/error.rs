//! Error types for task operations.
//!
//! Two layers are kept apart:
//!
//! - [`TaskFailure`] is what a task *recorded*: the work unit's own error, a
//!   missed deadline, or a worker panic. It is stored on the
//!   [`TaskRecord`](crate::TaskRecord) and never thrown at the submitter.
//! - [`TaskError`] is what a caller *receives* from
//!   [`TaskManager::result`](crate::TaskManager::result): lookup and protocol
//!   errors, plus the recorded failure re-raised with the task identifier
//!   attached.

use std::time::Duration;

use thiserror::Error;

/// Why a task ended in `FAILED`.
///
/// `E` is the work unit's domain error type; it is carried unchanged so the
/// caller can react to the original cause (for example, mapping a missing
/// log date to a 404).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFailure<E> {
    /// The work unit returned an error.
    #[error("{0}")]
    Work(E),

    /// The work unit was still running when the deadline elapsed.
    #[error("task did not finish within {}ms", .timeout.as_millis())]
    TimedOut {
        /// The deadline that was missed.
        timeout: Duration,
    },

    /// The worker running the unit panicked or went away before reporting.
    #[error("task worker aborted: {0}")]
    Aborted(String),
}

impl<E> TaskFailure<E> {
    /// Returns `true` if this failure is a missed deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Errors returned when querying a task's result.
///
/// # Examples
///
/// ```
/// use raceapp_tasks::TaskError;
///
/// let err: TaskError<String> = TaskError::NotFound {
///     task_id: "deadbeef".to_string(),
/// };
/// assert_eq!(err.to_string(), "task not found: deadbeef");
/// assert!(!err.is_task_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError<E> {
    /// No record exists for the identifier (never issued or already evicted).
    #[error("task not found: {task_id}")]
    NotFound {
        /// The identifier that was looked up.
        task_id: String,
    },

    /// The task has not reached a terminal state yet. Callers are expected
    /// to poll `status` first, so this indicates a protocol violation rather
    /// than a task failure.
    #[error("task not completed: {task_id}")]
    NotReady {
        /// The identifier that was looked up.
        task_id: String,
    },

    /// The work unit failed with a domain error, re-raised verbatim.
    #[error("task {task_id} failed: {cause}")]
    Failed {
        /// The failed task.
        task_id: String,
        /// The error returned by the work unit.
        cause: E,
    },

    /// The work unit missed its deadline.
    #[error("task {task_id} timed out after {}ms", .timeout.as_millis())]
    TimedOut {
        /// The timed-out task.
        task_id: String,
        /// The deadline that was missed.
        timeout: Duration,
    },

    /// The worker panicked before producing a value.
    #[error("task {task_id} aborted: {reason}")]
    Aborted {
        /// The aborted task.
        task_id: String,
        /// Panic message, when one could be extracted.
        reason: String,
    },
}

impl<E> TaskError<E> {
    /// Attaches a task identifier to a recorded failure.
    pub fn from_failure(task_id: impl Into<String>, failure: TaskFailure<E>) -> Self {
        let task_id = task_id.into();
        match failure {
            TaskFailure::Work(cause) => Self::Failed { task_id, cause },
            TaskFailure::TimedOut { timeout } => Self::TimedOut { task_id, timeout },
            TaskFailure::Aborted(reason) => Self::Aborted { task_id, reason },
        }
    }

    /// Returns `true` if the task itself reached `FAILED` (as opposed to a
    /// lookup or protocol error).
    pub fn is_task_failure(&self) -> bool {
        matches!(
            self,
            Self::Failed { .. } | Self::TimedOut { .. } | Self::Aborted { .. }
        )
    }
}

/// Errors raised while building a [`TaskManager`](crate::TaskManager).
#[derive(Debug, Error)]
pub enum ManagerError {
    /// The configuration holds a value the manager cannot run with.
    #[error("invalid task configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// No Tokio runtime was available to host timers and the sweeper.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
