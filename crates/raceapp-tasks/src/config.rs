//! Task manager configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RETENTION, DEFAULT_SWEEP_INTERVAL, DEFAULT_TASK_TIMEOUT};
use crate::error::ManagerError;

/// Tunables for a [`TaskManager`](crate::TaskManager).
///
/// Durations are stored in milliseconds so the struct maps directly onto a
/// TOML table.
///
/// # Defaults
///
/// | Setting             | Default    | Description                               |
/// |---------------------|------------|-------------------------------------------|
/// | `task_timeout_ms`   | 30,000     | Per-task deadline                         |
/// | `retention_ms`      | 3,600,000  | Age at which records are evicted (1 hour) |
/// | `sweep_interval_ms` | 3,600,000  | Period of the expiry sweeper (1 hour)     |
/// | `worker_threads`    | 0          | Worker pool size; 0 means one per CPU     |
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use raceapp_tasks::TaskConfig;
///
/// let config = TaskConfig::default()
///     .with_task_timeout(Duration::from_secs(5))
///     .with_worker_threads(2);
/// assert_eq!(config.task_timeout(), Duration::from_secs(5));
/// assert_eq!(config.retention(), Duration::from_secs(3600));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Deadline for a single work unit, in milliseconds.
    pub task_timeout_ms: u64,

    /// Records older than this many milliseconds are evicted by the sweeper.
    pub retention_ms: u64,

    /// Sweeper period in milliseconds.
    pub sweep_interval_ms: u64,

    /// Number of worker threads running work units. `0` lets the pool pick
    /// one thread per available CPU.
    pub worker_threads: usize,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            task_timeout_ms: duration_ms(DEFAULT_TASK_TIMEOUT),
            retention_ms: duration_ms(DEFAULT_RETENTION),
            sweep_interval_ms: duration_ms(DEFAULT_SWEEP_INTERVAL),
            worker_threads: 0,
        }
    }
}

impl TaskConfig {
    /// Sets the per-task deadline.
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout_ms = duration_ms(timeout);
        self
    }

    /// Sets the retention window.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention_ms = duration_ms(retention);
        self
    }

    /// Sets the sweeper period.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval_ms = duration_ms(interval);
        self
    }

    /// Sets the worker pool size.
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    /// Per-task deadline.
    pub fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.task_timeout_ms)
    }

    /// Retention window.
    pub fn retention(&self) -> Duration {
        Duration::from_millis(self.retention_ms)
    }

    /// Sweeper period.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Rejects values the manager cannot run with.
    ///
    /// A zero timeout would fail every task, and a zero sweep interval is not
    /// a valid timer period.
    pub fn validate(&self) -> Result<(), ManagerError> {
        if self.task_timeout_ms == 0 {
            return Err(ManagerError::InvalidConfig(
                "task_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.retention_ms == 0 {
            return Err(ManagerError::InvalidConfig(
                "retention_ms must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval_ms == 0 {
            return Err(ManagerError::InvalidConfig(
                "sweep_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_constants() {
        let config = TaskConfig::default();
        assert_eq!(config.task_timeout(), DEFAULT_TASK_TIMEOUT);
        assert_eq!(config.retention(), DEFAULT_RETENTION);
        assert_eq!(config.sweep_interval(), DEFAULT_SWEEP_INTERVAL);
        assert_eq!(config.worker_threads, 0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: TaskConfig = toml::from_str("task_timeout_ms = 1500").unwrap();
        assert_eq!(config.task_timeout(), Duration::from_millis(1500));
        assert_eq!(config.retention(), DEFAULT_RETENTION);
    }

    #[test]
    fn validate_rejects_zero_durations() {
        let err = TaskConfig::default()
            .with_task_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("task_timeout_ms"));

        assert!(TaskConfig::default()
            .with_retention(Duration::ZERO)
            .validate()
            .is_err());
        assert!(TaskConfig::default()
            .with_sweep_interval(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn oversized_durations_saturate() {
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
        assert_eq!(duration_ms(Duration::from_millis(1500)), 1500);

        let config = TaskConfig::default().with_task_timeout(Duration::MAX);
        assert_eq!(config.task_timeout_ms, u64::MAX);
    }

    #[test]
    fn zero_worker_threads_is_valid() {
        assert!(TaskConfig::default().with_worker_threads(0).validate().is_ok());
    }
}
