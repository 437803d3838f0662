//! Domain types for internal task representation.
//!
//! [`TaskRecord`] is the registry's entry for one submission: identity,
//! creation time and the (eventually) resolved outcome.

pub mod record;

pub use record::*;
