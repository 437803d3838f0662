//! Caller-facing task types.
//!
//! - [`TaskId`] - Short opaque identifier handed back on submission
//! - [`TaskStatus`] - Point-in-time status label reported by `status`

pub mod id;
pub mod status;

pub use id::TaskId;
pub use status::TaskStatus;
