//! Task manager facade.
//!
//! [`TaskManager`] ties the pieces together for the HTTP layer: it owns the
//! [`TaskRegistry`], submits work through the [`TaskExecutor`], and keeps an
//! [`ExpirySweeper`] running for as long as it lives. It performs no business
//! logic itself; the work unit passed to [`submit`](TaskManager::submit)
//! carries that.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;

use crate::config::TaskConfig;
use crate::domain::TaskRecord;
use crate::error::{ManagerError, TaskError};
use crate::executor::TaskExecutor;
use crate::registry::TaskRegistry;
use crate::sweeper::{self, ExpirySweeper};
use crate::types::{TaskId, TaskStatus};

/// Submits work units and answers status and result queries.
///
/// `T` is the artifact a successful work unit produces and `E` its domain
/// error. Both are cloned out on every [`result`](TaskManager::result) call,
/// so cheaply cloneable types (such as `bytes::Bytes`) are a good fit.
///
/// # Examples
///
/// ```
/// use raceapp_tasks::{TaskConfig, TaskError, TaskManager, TaskStatus};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let manager: TaskManager<u64, String> = TaskManager::new(TaskConfig::default())?;
///
/// assert_eq!(manager.status("00000000"), TaskStatus::NotFound);
/// assert!(matches!(
///     manager.result("00000000"),
///     Err(TaskError::NotFound { .. })
/// ));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TaskManager<T, E> {
    registry: Arc<TaskRegistry<T, E>>,
    executor: TaskExecutor,
    sweeper: ExpirySweeper,
    config: TaskConfig,
}

impl<T, E> TaskManager<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Creates a manager on the current Tokio runtime.
    ///
    /// Fails if called outside a runtime, if the configuration is invalid,
    /// or if the worker pool cannot be started.
    pub fn new(config: TaskConfig) -> Result<Self, ManagerError> {
        let runtime = Handle::try_current()?;
        Self::with_runtime(config, runtime)
    }

    /// Creates a manager whose timers and sweeper run on `runtime`.
    pub fn with_runtime(config: TaskConfig, runtime: Handle) -> Result<Self, ManagerError> {
        config.validate()?;

        let registry = Arc::new(TaskRegistry::new());
        let executor = TaskExecutor::new(&config, runtime.clone())?;
        let sweeper = ExpirySweeper::spawn(
            Arc::clone(&registry),
            config.sweep_interval(),
            config.retention(),
            &runtime,
        );

        tracing::debug!(
            worker_threads = executor.worker_threads(),
            timeout_ms = config.task_timeout_ms,
            retention_ms = config.retention_ms,
            sweep_interval_ms = config.sweep_interval_ms,
            "Task manager started"
        );

        Ok(Self {
            registry,
            executor,
            sweeper,
            config,
        })
    }

    /// Registers a new task for `work` and schedules it. Never blocks.
    ///
    /// The record is in the registry before this returns, so an immediate
    /// [`status`](TaskManager::status) call never reports `NOT_FOUND`.
    pub fn submit<F>(&self, work: F) -> TaskId
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        let task_id = TaskId::generate();
        let record = Arc::new(TaskRecord::new(task_id.clone()));

        if self.registry.insert(Arc::clone(&record)).is_some() {
            tracing::warn!(task_id = %task_id, "Task id collision replaced an older record");
        }
        self.executor.execute(record, work);

        tracing::debug!(task_id = %task_id, "Task submitted");
        task_id
    }

    /// Point-in-time status of a task. Never fails.
    pub fn status(&self, task_id: &str) -> TaskStatus {
        self.registry
            .get(task_id)
            .map_or(TaskStatus::NotFound, |record| record.status())
    }

    /// Returns the task's artifact, or the reason it cannot.
    ///
    /// - [`TaskError::NotFound`] if no record exists.
    /// - [`TaskError::NotReady`] if the task is still in progress.
    /// - [`TaskError::Failed`], [`TaskError::TimedOut`] or
    ///   [`TaskError::Aborted`] re-raising the recorded failure.
    ///
    /// A completed task may be read any number of times until it is evicted.
    pub fn result(&self, task_id: &str) -> Result<T, TaskError<E>>
    where
        T: Clone,
        E: Clone,
    {
        let record = self
            .registry
            .get(task_id)
            .ok_or_else(|| TaskError::NotFound {
                task_id: task_id.to_string(),
            })?;

        match record.outcome() {
            None => Err(TaskError::NotReady {
                task_id: task_id.to_string(),
            }),
            Some(Ok(artifact)) => Ok(artifact.clone()),
            Some(Err(failure)) => Err(TaskError::from_failure(task_id, failure.clone())),
        }
    }

    /// Runs one sweep cycle now, outside the regular schedule.
    pub fn sweep_expired(&self) -> usize {
        sweeper::sweep_once(&self.registry, self.config.retention())
    }

    /// Runs one sweep cycle as if the current time were `now`.
    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        self.registry.remove_expired(now, self.config.retention())
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if no records are held.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// The configuration the manager was built with.
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<TaskRegistry<T, E>> {
        &self.registry
    }

    /// Stops the background sweeper. In-flight tasks still resolve.
    pub fn shutdown(&self) {
        self.sweeper.shutdown();
    }
}
