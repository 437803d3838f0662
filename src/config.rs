//! Server configuration.
//!
//! Configuration can be loaded from:
//! 1. TOML file (`raceapp.toml`, or an explicit path)
//! 2. Environment variables (with `RACEAPP_` prefix)
//!
//! Command-line flags are applied by the binary on top of both.
//!
//! # Example Configuration
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! log_file = "logs/application.log"
//! generation_delay_ms = 5000
//!
//! [tasks]
//! task_timeout_ms = 30000
//! retention_ms = 3600000
//! sweep_interval_ms = 3600000
//! worker_threads = 0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use raceapp_tasks::TaskConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logs::source::DEFAULT_LOG_FILE;

/// File read by [`ServerConfig::load`] when it exists.
pub const CONFIG_FILE: &str = "raceapp.toml";

/// Prefix of recognized environment variables.
pub const ENV_PREFIX: &str = "RACEAPP_";

/// Top-level configuration of the raceapp server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Application log to extract from.
    pub log_file: PathBuf,

    /// Delay before each background extraction, in milliseconds.
    pub generation_delay_ms: u64,

    /// Task executor settings.
    pub tasks: TaskConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            generation_delay_ms: 5_000,
            tasks: TaskConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `raceapp.toml` and environment variables.
    ///
    /// A missing file means defaults; environment variables override either.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = if Path::new(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file, then environment variables.
    ///
    /// Unlike [`load`](Self::load), the file must exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file without environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `RACEAPP_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides read through `lookup`, keyed by full variable name.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(log_file) = var("LOG_FILE") {
            self.log_file = PathBuf::from(log_file);
        }

        override_parsed(&var, "PORT", &mut self.port);
        override_parsed(&var, "GENERATION_DELAY_MS", &mut self.generation_delay_ms);

        // Task executor
        override_parsed(&var, "TASK_TIMEOUT_MS", &mut self.tasks.task_timeout_ms);
        override_parsed(&var, "RETENTION_MS", &mut self.tasks.retention_ms);
        override_parsed(&var, "SWEEP_INTERVAL_MS", &mut self.tasks.sweep_interval_ms);
        override_parsed(&var, "WORKER_THREADS", &mut self.tasks.worker_threads);
    }

    /// Apply command-line overrides and re-check the result.
    pub fn apply_cli_overrides(
        &mut self,
        host: Option<String>,
        port: Option<u16>,
        log_file: Option<PathBuf>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(log_file) = log_file {
            self.log_file = log_file;
        }
        self.validate()
    }

    /// Checks the values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        self.tasks
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Delay before each background extraction.
    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }

    /// `host:port` string accepted by `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn override_parsed<T, V>(var: &V, name: &str, target: &mut T)
where
    T: std::str::FromStr,
    V: Fn(&str) -> Option<String>,
{
    if let Some(raw) = var(name) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!(
                variable = %format!("{ENV_PREFIX}{name}"),
                value = %raw,
                "Ignoring unparseable configuration override"
            ),
        }
    }
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {message}", .path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
