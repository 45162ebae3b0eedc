//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Problems with a single file inside a workspace (unreadable, undecodable,
//! undeletable) are not errors: they are logged and the file is skipped.
//! Errors are reserved for failures that abort a whole directory or archive.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a failure.
///
/// ### Pipeline Stages
/// These carry the archive being processed, so the report says which stage
/// failed for which archive. The archive is untouched in every case.
/// - [`ErrorKind::Extract`]
/// - [`ErrorKind::Process`]
/// - [`ErrorKind::Repack`]
///
/// ### Operational Errors
/// - [`ErrorKind::Walk`]
/// - [`ErrorKind::Metadata`]
/// - [`ErrorKind::Io`]
/// - [`ErrorKind::Task`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The archive could not be extracted (missing, corrupt or unsupported).
    #[display("extraction failed: {}", _0.display())]
    Extract(#[error(not(source))] PathBuf),
    /// Classification or a mutation of the extracted workspace failed.
    #[display("processing failed: {}", _0.display())]
    Process(#[error(not(source))] PathBuf),
    /// The archive could not be rebuilt from the workspace.
    #[display("repack failed: {}", _0.display())]
    Repack(#[error(not(source))] PathBuf),
    /// The directory to process does not exist or could not be listed.
    #[display("failed to walk directory")]
    Walk,
    /// Reading, merging or writing the metadata descriptor failed.
    #[display("metadata descriptor error")]
    Metadata,
    #[display("I/O error")]
    Io,
    /// A batch worker panicked or was cancelled.
    #[display("background task failed")]
    Task,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}
