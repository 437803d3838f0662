//! Background log extraction.
//!
//! [`LogTaskService`] wraps a [`TaskManager`] whose work units call a
//! [`LogSource`] after a fixed generation delay. It is the glue between the
//! HTTP handlers and the generic task machinery.

use std::sync::Arc;
use std::time::Duration;

use raceapp_tasks::{ManagerError, TaskConfig, TaskError, TaskId, TaskManager, TaskStatus};

use super::source::{LogArtifact, LogError, LogSource};

/// Message reported when a generation worker dies without a domain error.
pub const GENERATION_FAILED: &str = "Log generation failed";

/// Runs log extractions as background tasks.
#[derive(Debug)]
pub struct LogTaskService {
    manager: TaskManager<LogArtifact, LogError>,
    source: Arc<dyn LogSource>,
    generation_delay: Duration,
}

impl LogTaskService {
    /// Creates a service on the current Tokio runtime.
    pub fn new(
        source: Arc<dyn LogSource>,
        tasks: TaskConfig,
        generation_delay: Duration,
    ) -> Result<Self, ManagerError> {
        Ok(Self {
            manager: TaskManager::new(tasks)?,
            source,
            generation_delay,
        })
    }

    /// Submits an extraction for `date` and returns its identifier at once.
    ///
    /// The date is not validated here; a malformed date surfaces later as a
    /// failed task carrying [`LogError::BadInput`].
    pub fn start_generation(&self, date: &str) -> TaskId {
        let source = Arc::clone(&self.source);
        let delay = self.generation_delay;
        let date = date.to_string();

        let task_id = self.manager.submit(move || {
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            source.fetch(&date)
        });

        tracing::info!(task_id = %task_id, "Log generation started");
        task_id
    }

    /// Current status of a generation task.
    pub fn status(&self, task_id: &str) -> TaskStatus {
        self.manager.status(task_id)
    }

    /// The extract produced by a completed task.
    ///
    /// A worker that aborted without a domain error is reported as
    /// [`LogError::Internal`] with [`GENERATION_FAILED`].
    pub fn result(&self, task_id: &str) -> Result<LogArtifact, TaskError<LogError>> {
        match self.manager.result(task_id) {
            Err(TaskError::Aborted { task_id, reason }) => {
                tracing::error!(task_id = %task_id, reason = %reason, "Log generation aborted");
                Err(TaskError::Failed {
                    task_id,
                    cause: LogError::Internal(GENERATION_FAILED.to_string()),
                })
            },
            other => other,
        }
    }

    /// The underlying task manager.
    pub fn manager(&self) -> &TaskManager<LogArtifact, LogError> {
        &self.manager
    }

    /// The configured delay before each extraction.
    pub fn generation_delay(&self) -> Duration {
        self.generation_delay
    }
}
