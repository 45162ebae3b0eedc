//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The registry side file exists but could not be read or parsed.
    #[display("invalid registry file: {}", _0.display())]
    Registry(#[error(not(source))] PathBuf),
    /// An explicitly requested settings file does not exist.
    #[display("settings file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Layered settings could not be merged into a valid [`Settings`](crate::Settings).
    #[display("invalid settings")]
    Settings,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
