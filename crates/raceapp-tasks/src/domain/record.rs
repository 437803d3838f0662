//! Task record -- the registry's entry for one submitted work unit.

use std::sync::OnceLock;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::TaskFailure;
use crate::types::{TaskId, TaskStatus};

/// Resolved result of a work unit.
pub type Outcome<T, E> = Result<T, TaskFailure<E>>;

/// Registry entry tracking one submitted work unit.
///
/// A record is created once per submission and never replaced. Its only
/// moving part is the outcome slot, which is written at most once: the first
/// resolution (value, error, panic or timeout) wins and later ones are
/// dropped. The status is derived from that slot and therefore only moves
/// forward.
///
/// # Examples
///
/// ```
/// use raceapp_tasks::{TaskId, TaskRecord, TaskStatus};
///
/// let record: TaskRecord<String, String> = TaskRecord::new(TaskId::generate());
/// assert_eq!(record.status(), TaskStatus::InProgress);
/// assert!(record.outcome().is_none());
/// ```
#[derive(Debug)]
pub struct TaskRecord<T, E> {
    id: TaskId,
    created_at: DateTime<Utc>,
    outcome: OnceLock<Outcome<T, E>>,
}

impl<T, E> TaskRecord<T, E> {
    /// Creates an unresolved record stamped with the current UTC time.
    pub fn new(id: TaskId) -> Self {
        Self::with_created_at(id, Utc::now())
    }

    /// Creates an unresolved record with an explicit creation time.
    ///
    /// Useful for seeding a registry with records of a known age.
    pub fn with_created_at(id: TaskId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            outcome: OnceLock::new(),
        }
    }

    /// The task identifier.
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// When the task was submitted.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current status derived from the outcome slot.
    pub fn status(&self) -> TaskStatus {
        match self.outcome.get() {
            None => TaskStatus::InProgress,
            Some(Ok(_)) => TaskStatus::Completed,
            Some(Err(_)) => TaskStatus::Failed,
        }
    }

    /// The resolved outcome, if any.
    pub fn outcome(&self) -> Option<&Outcome<T, E>> {
        self.outcome.get()
    }

    /// Stores the outcome if none has been stored yet.
    ///
    /// Returns `false` when the record was already resolved; the given
    /// outcome is then discarded.
    pub fn resolve(&self, outcome: Outcome<T, E>) -> bool {
        self.outcome.set(outcome).is_ok()
    }

    /// Returns `true` if the record is older than `retention` at `now`.
    ///
    /// A retention too large to represent never expires.
    pub fn is_expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        let deadline = chrono::Duration::from_std(retention)
            .ok()
            .and_then(|retention| self.created_at.checked_add_signed(retention));
        match deadline {
            Some(deadline) => now > deadline,
            None => false,
        }
    }
}
