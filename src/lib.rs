//! # raceapp
//!
//! HTTP service that extracts one day's lines from an application log.
//!
//! Extracts can be downloaded synchronously, or generated in the background:
//! `POST /api/logs/generate` returns a short task id at once, and the caller
//! polls `/api/logs/status/{taskId}` until the task is `COMPLETED` or
//! `FAILED` before fetching `/api/logs/result/{taskId}`. Task execution,
//! deadlines and eviction live in the [`raceapp_tasks`] crate.
//!
//! ## Modules
//!
//! - [`config`] - server configuration (TOML file + `RACEAPP_*` environment)
//! - [`logs`] - date-based log lookup and the background generation service
//! - [`server`] - axum router, handlers and the serve loop
//! - [`error`] - mapping of failures to HTTP responses

pub mod config;
pub mod error;
pub mod logs;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use logs::{FileLogSource, LogArtifact, LogError, LogSource, LogTaskService};
pub use server::{router, serve, AppState};
