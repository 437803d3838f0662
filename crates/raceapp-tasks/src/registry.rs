//! Concurrent task registry.
//!
//! [`TaskRegistry`] maps task identifiers to shared [`TaskRecord`]s using a
//! [`DashMap`]. It is a plain concurrent map with no lifecycle logic of its
//! own: the executor resolves records, the sweeper asks for expired entries
//! to be removed, and the manager reads.
//!
//! # Concurrency
//!
//! `DashMap` locks per shard, so inserts, lookups and removals on different
//! tasks do not serialize behind one lock. Expiry removal runs under each
//! shard's write lock in turn and re-checks staleness on the live entry, so
//! a record is removed only if it is still present and still stale at the
//! moment it is examined.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::TaskRecord;
use crate::types::TaskId;

/// Thread-safe store of active task records.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use raceapp_tasks::{TaskId, TaskRecord, TaskRegistry};
///
/// let registry: TaskRegistry<String, String> = TaskRegistry::new();
/// let record = Arc::new(TaskRecord::new(TaskId::from("a1b2c3d4")));
/// registry.insert(Arc::clone(&record));
///
/// assert!(registry.get("a1b2c3d4").is_some());
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug)]
pub struct TaskRegistry<T, E> {
    tasks: DashMap<TaskId, Arc<TaskRecord<T, E>>>,
}

impl<T, E> TaskRegistry<T, E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
        }
    }

    /// Inserts a record under its own identifier.
    ///
    /// Returns the record previously stored under the same identifier, which
    /// only happens on an identifier collision.
    pub fn insert(&self, record: Arc<TaskRecord<T, E>>) -> Option<Arc<TaskRecord<T, E>>> {
        self.tasks.insert(record.id().clone(), record)
    }

    /// Looks up a record by identifier.
    pub fn get(&self, task_id: &str) -> Option<Arc<TaskRecord<T, E>>> {
        self.tasks
            .get(task_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Returns `true` if a record exists for the identifier.
    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.contains_key(task_id)
    }

    /// Returns the number of records stored.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Removes every record older than `retention` at `now`, whatever its
    /// state, and returns how many were removed.
    ///
    /// Records inserted with a creation time after `now - retention` are
    /// kept, so a record submitted while a sweep is in progress survives it.
    pub fn remove_expired(&self, now: DateTime<Utc>, retention: Duration) -> usize {
        let mut removed = 0;
        self.tasks.retain(|_, record| {
            if record.is_expired(now, retention) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}

impl<T, E> Default for TaskRegistry<T, E> {
    fn default() -> Self {
        Self::new()
    }
}
