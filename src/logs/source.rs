//! Date-based lookup in the application log.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use bytes::Bytes;
use chrono::NaiveDate;
use thiserror::Error;

/// Format accepted for request dates, e.g. `01.01.2023`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Default location of the application log.
pub const DEFAULT_LOG_FILE: &str = "logs/application.log";

/// Errors raised while extracting log lines.
///
/// The variants map one-to-one onto HTTP client errors, missing content and
/// server faults. Messages are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    /// The requested date is missing or malformed.
    #[error("{0}")]
    BadInput(String),

    /// The log holds no lines for the requested date.
    #[error("{0}")]
    NotFound(String),

    /// The log could not be read, or extraction failed unexpectedly.
    #[error("{0}")]
    Internal(String),
}

/// Lines extracted for one calendar date.
///
/// Content is held in [`Bytes`], so clones share the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogArtifact {
    date: NaiveDate,
    content: Bytes,
}

impl LogArtifact {
    /// Creates an artifact for `date`.
    pub fn new(date: NaiveDate, content: impl Into<Bytes>) -> Self {
        Self {
            date,
            content: content.into(),
        }
    }

    /// The date the lines were extracted for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The extracted lines, newline-separated.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Attachment name used by the synchronous download, `dd.MM.yyyy.log`.
    pub fn file_name(&self) -> String {
        format!("{}.log", self.date.format(DATE_FORMAT))
    }
}

/// Source of per-date log extracts.
///
/// Implementations are blocking and are called from worker threads.
pub trait LogSource: Send + Sync + fmt::Debug {
    /// Returns the lines logged on `date` (`dd.MM.yyyy`).
    fn fetch(&self, date: &str) -> Result<LogArtifact, LogError>;
}

/// Parses a request date in `dd.MM.yyyy` form.
///
/// Day and month take exactly two digits and the year four; anything that
/// does not format back to the same text is rejected.
///
/// # Examples
///
/// ```
/// use raceapp::logs::{parse_date, LogError};
///
/// let date = parse_date("01.02.2023").unwrap();
/// assert_eq!(date.to_string(), "2023-02-01");
///
/// assert!(matches!(parse_date(""), Err(LogError::BadInput(_))));
/// assert!(matches!(parse_date("2023-02-01"), Err(LogError::BadInput(_))));
/// assert!(matches!(parse_date("1.2.2023"), Err(LogError::BadInput(_))));
/// ```
pub fn parse_date(raw: &str) -> Result<NaiveDate, LogError> {
    if raw.is_empty() {
        return Err(LogError::BadInput("Date cannot be null or empty".to_string()));
    }
    let invalid = || LogError::BadInput("Invalid date format. Use dd.MM.yyyy".to_string());

    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())?;
    // chrono accepts unpadded fields, short years and leading spaces.
    if date.format(DATE_FORMAT).to_string() != raw {
        return Err(invalid());
    }
    Ok(date)
}

/// Reads a plain-text log whose lines start with an ISO date
/// (`2023-01-01 12:00:00 INFO ...`).
///
/// The file is re-read on every call, so lines appended by a running
/// application are picked up.
#[derive(Debug, Clone)]
pub struct FileLogSource {
    path: PathBuf,
}

impl FileLogSource {
    /// Creates a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for FileLogSource {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }
}

impl LogSource for FileLogSource {
    fn fetch(&self, date: &str) -> Result<LogArtifact, LogError> {
        let target = parse_date(date)?;
        let prefix = target.format("%Y-%m-%d").to_string();

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| LogError::Internal(format!("Error reading log file: {e}")))?;

        let lines: Vec<&str> = contents
            .lines()
            .filter(|line| line.starts_with(&prefix))
            .collect();

        if lines.is_empty() {
            return Err(LogError::NotFound(format!("No logs found for date: {date}")));
        }

        tracing::debug!(
            date = %prefix,
            lines = lines.len(),
            path = %self.path.display(),
            "Extracted log lines"
        );
        Ok(LogArtifact::new(target, lines.join("\n")))
    }
}
