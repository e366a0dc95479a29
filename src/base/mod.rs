//! Base types and error handling.
//!
//! - [`CheckError`]: request-level failures (missing domain, resolver list)
//! - [`LookupError`]: per-resolver failures, rendered into outcome text

pub mod checkerror;
pub mod context;

pub use checkerror::{CheckError, ErrorBody, LookupError};
