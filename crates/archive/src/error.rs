//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The archive does not exist (or is not a regular file).
    #[display("archive not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The archive format is recognised but cannot be handled.
    #[display("unsupported format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// Archive is corrupt or malformed. Don't retry with the same input.
    #[display("invalid or corrupted archive")]
    InvalidData,
    /// An entry path escapes the workspace or cannot be represented.
    #[display("invalid entry path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// An entry name resolves to the workspace root rather than a file.
    #[display("entry name {_0:?} does not name a file")]
    EmptyEntryName(#[error(not(source))] String),
    /// An I/O operation failed (disk full, permissions, ...).
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exn::ResultExt;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::InvalidData.to_string(), "invalid or corrupted archive");
        assert_eq!(ErrorKind::UnsupportedFormat("rar".to_string()).to_string(), "unsupported format: rar");
        assert_eq!(ErrorKind::NotFound(PathBuf::from("a.cbz")).to_string(), "archive not found: a.cbz");
        assert_eq!(ErrorKind::Io.to_string(), "I/O error");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(!ErrorKind::InvalidData.is_retryable());
        assert!(!ErrorKind::UnsupportedFormat("pdf".to_string()).is_retryable());
        assert!(ErrorKind::Io.is_retryable());
    }

    #[test]
    fn error_from_result() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full"));
        let err: Result<()> = result.or_raise(|| ErrorKind::Io);
        let exn = err.unwrap_err();
        // Exn<E> implements Deref<Target = E>
        assert_eq!(*exn, ErrorKind::Io);
    }
}
