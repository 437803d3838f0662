//! Status labels reported to callers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Point-in-time status of a task, as reported by
/// [`TaskManager::status`](crate::TaskManager::status).
///
/// `InProgress` covers both "queued for a worker" and "running"; the two are
/// not distinguished. `Completed` and `Failed` are terminal. `NotFound` is a
/// pseudo-state for identifiers that were never issued or have been evicted.
///
/// Labels serialize in upper snake case (`"IN_PROGRESS"`), which is the form
/// the HTTP layer returns.
///
/// # Examples
///
/// ```
/// use raceapp_tasks::TaskStatus;
///
/// assert_eq!(TaskStatus::InProgress.as_str(), "IN_PROGRESS");
/// assert!(TaskStatus::Failed.is_terminal());
/// assert!(!TaskStatus::NotFound.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// No record exists for the identifier.
    NotFound,
    /// The work unit has not resolved yet.
    InProgress,
    /// The work unit produced a value before the deadline (terminal).
    Completed,
    /// The work unit failed, panicked, or missed the deadline (terminal).
    Failed,
}

impl TaskStatus {
    /// Returns the wire label for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    /// Returns `true` for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
