//! Ergonomic error context helpers.
//!
//! Extension traits that turn bare `io::Error`s into context-rich
//! [`CheckError`] and [`LookupError`] values.

use crate::base::checkerror::{CheckError, LookupError};
use std::{io, path::Path};

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Mark an IO failure as a resolver list load failure for `path`.
    ///
    /// # Example
    /// ```ignore
    /// use dnscheck::base::context::IoResultExt;
    ///
    /// let text = tokio::fs::read_to_string(&path).await
    ///     .config_context(&path)?;
    /// // Error: "could not load resolver list from list.csv: No such file or directory (os error 2)"
    /// ```
    fn config_context(self, path: &Path) -> Result<T, CheckError>;

    /// Name the step of a DNS exchange that failed.
    fn exchange_context(self, op: &'static str) -> Result<T, LookupError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn config_context(self, path: &Path) -> Result<T, CheckError> {
        self.map_err(|e| CheckError::config_load(path.display().to_string(), e.to_string()))
    }

    fn exchange_context(self, op: &'static str) -> Result<T, LookupError> {
        self.map_err(|source| LookupError::Io { op, source })
    }
}
