//! Default durations and identifier sizing.

use std::time::Duration;

/// How long a work unit may run before its task is forced into `FAILED`.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(30);

/// Age after which a task record is evicted, whatever its state.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60 * 60);

/// Period of the expiry sweeper.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Number of characters in a generated task identifier.
pub const TASK_ID_LEN: usize = 8;
