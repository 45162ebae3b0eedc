use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::Path;
use tempfile::TempDir;

const WORKSPACE_PREFIX: &str = "cbnorm-";

/// A scratch directory holding the extracted contents of one archive.
///
/// The directory (and everything inside it) is removed when the workspace is
/// dropped, on every exit path. Call [`close`](Self::close) instead of
/// dropping when the caller wants to know whether deletion succeeded.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}
impl Workspace {
    /// Create an empty workspace in the system temporary directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(WORKSPACE_PREFIX).tempdir().or_raise(|| ErrorKind::Io)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Delete the workspace, reporting any failure.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().or_raise(|| ErrorKind::Io)?;
        tracing::trace!(workspace = %path.display(), "Workspace deleted");
        Ok(())
    }
}
impl AsRef<Path> for Workspace {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}
