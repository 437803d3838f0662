//! Asynchronous task execution and lifecycle management for raceapp.
//!
//! Long-running log extractions are not served on the request path. A caller
//! submits a unit of work, receives a short task identifier immediately, and
//! polls for the outcome later. This crate owns everything between those two
//! points: running the work off-thread, bounding it with a per-task timeout,
//! tracking its state, and evicting stale records.
//!
//! # Overview
//!
//! A task moves through a small state machine:
//!
//! ```text
//! IN_PROGRESS -> COMPLETED   (work returned a value before the deadline)
//! IN_PROGRESS -> FAILED      (work returned an error, panicked, or timed out)
//! ```
//!
//! Terminal states never change. Identifiers that were never issued, or whose
//! records have been swept, report `NOT_FOUND`.
//!
//! # Module Organization
//!
//! - [`types`] - Task identifiers and the status labels exposed to callers
//! - [`domain`] - [`TaskRecord`], the registry entry for one submission
//! - [`registry`] - Concurrent task registry backed by `DashMap`
//! - [`executor`] - Worker pool and per-task deadline
//! - [`sweeper`] - Recurring eviction of expired records
//! - [`manager`] - [`TaskManager`], the facade used by the HTTP layer
//! - [`config`] - Tunables (timeout, retention, sweep interval, pool size)
//! - [`error`] - Error and failure types
//! - [`constants`] - Default durations and identifier length
//!
//! # Example
//!
//! ```
//! use raceapp_tasks::{TaskConfig, TaskManager, TaskStatus};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager: TaskManager<String, String> = TaskManager::new(TaskConfig::default())?;
//!
//! let task_id = manager.submit(|| Ok("2023-01-01 INFO started".to_string()));
//! assert_ne!(manager.status(task_id.as_str()), TaskStatus::NotFound);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod executor;
pub mod manager;
pub mod registry;
pub mod sweeper;
pub mod types;

// Re-exports for ergonomic access
pub use config::TaskConfig;
pub use constants::*;
pub use domain::TaskRecord;
pub use error::{ManagerError, TaskError, TaskFailure};
pub use executor::TaskExecutor;
pub use manager::TaskManager;
pub use registry::TaskRegistry;
pub use sweeper::ExpirySweeper;
pub use types::{TaskId, TaskStatus};
