//! Log extraction, synchronous and as background tasks.

pub mod source;
pub mod tasks;

pub use source::{parse_date, FileLogSource, LogArtifact, LogError, LogSource, DATE_FORMAT};
pub use tasks::{LogTaskService, GENERATION_FAILED};
