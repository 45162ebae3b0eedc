//! Extraction and repacking of comic book archives.
//!
//! This crate is the boundary between an archive on disk and the scratch
//! directory the rest of the toolchain works in:
//!
//! - **Format detection** from file extensions ([`ArchiveFormat::from_path`])
//!   or magic bytes ([`ArchiveFormat::from_magic_bytes`])
//! - **Extraction** of an archive into a temporary [`Workspace`] that deletes
//!   itself when dropped
//! - **Repacking** a workspace back over the original archive, replacing the
//!   original only once the new archive has been completely written
//!
//! The [`Archiver`] trait is the seam used by the pipeline; [`ZipArchiver`]
//! implements it for the zip-based formats (`.cbz`, `.zip`). Other formats are
//! detected so they can be reported, but are rejected as unsupported.

mod construct;
pub mod error;
mod path;
mod util;
mod workspace;
mod zipfile;

pub use crate::path::validate as validate_path;
pub use crate::workspace::Workspace;
pub use crate::zipfile::ZipArchiver;
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// Rasterization zoom used when no explicit value has been configured.
pub const DEFAULT_ZOOM: f32 = 2.0;

pub type ArchiverHandle = Arc<dyn Archiver>;

/// A comic archive container format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Zip container (.cbz, .zip)
    Zip,
    /// RAR container (.cbr, .rar)
    Rar,
    /// 7-Zip container (.cb7, .7z)
    SevenZip,
    /// Tarball (.cbt, .tar)
    Tar,
    /// Page-based document (.pdf); pages are rasterized on extraction.
    Pdf,
}

/// Format-specific parameters used while extracting an archive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Rasterization zoom for page-based formats.
    pub zoom: f32,
}
impl Default for RenderOptions {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }
}
impl RenderOptions {
    pub fn new(zoom: f32) -> Self {
        Self { zoom }
    }
}

/// Turns an archive into a scratch directory and back again.
///
/// Implementations must never modify the archive during [`extract`](Self::extract),
/// and must leave the archive byte-for-byte untouched whenever
/// [`repack`](Self::repack) returns an error.
pub trait Archiver: Send + Sync {
    /// Extract every entry of `archive` into a fresh [`Workspace`].
    ///
    /// If extraction fails part way through, the partially populated
    /// workspace is dropped (and therefore deleted) before returning.
    fn extract(&self, archive: &Path, render: &RenderOptions) -> Result<Workspace>;

    /// Rebuild `archive` from the contents of `workspace`, overwriting the
    /// original only if the rebuild succeeds.
    fn repack(&self, workspace: &Workspace, archive: &Path) -> Result<()>;
}
