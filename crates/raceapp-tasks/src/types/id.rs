//! Task identifiers.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::TASK_ID_LEN;

/// Opaque identifier of a submitted task.
///
/// Generated identifiers are the first [`TASK_ID_LEN`] characters of a random
/// `UUIDv4` in simple (hyphen-less, lowercase hex) form. The space is small
/// enough that collisions are possible in principle; they are not guarded
/// against.
///
/// `TaskId` borrows as `str`, so registry lookups accept plain string slices
/// coming from request paths.
///
/// # Examples
///
/// ```
/// use raceapp_tasks::TaskId;
///
/// let id = TaskId::generate();
/// assert_eq!(id.as_str().len(), 8);
/// assert!(id.as_str().chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(TASK_ID_LEN);
        Self(id)
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_have_fixed_length() {
        for _ in 0..32 {
            assert_eq!(TaskId::generate().as_str().len(), TASK_ID_LEN);
        }
    }

    #[test]
    fn generated_ids_are_lowercase_alphanumeric() {
        let id = TaskId::generate();
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn generated_ids_differ() {
        let ids: HashSet<TaskId> = (0..100).map(|_| TaskId::generate()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn borrows_as_str_for_lookups() {
        let mut set = HashSet::new();
        set.insert(TaskId::from("abcd1234"));
        assert!(set.contains("abcd1234"));
        assert!(!set.contains("ffff0000"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TaskId::from("0a1b2c3d");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"0a1b2c3d\"");
        assert_eq!(id.to_string(), "0a1b2c3d");
    }
}
