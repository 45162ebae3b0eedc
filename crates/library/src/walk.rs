//! Directory traversal and file probing shared by the classifier and remover.

use crate::error::{ErrorKind, Result};
use image::ImageReader;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found under a walked directory.
#[derive(Debug)]
pub(crate) struct Entry {
    pub path: PathBuf,
    /// Path relative to the walked directory.
    pub relative: PathBuf,
    pub basename: String,
}
impl Entry {
    /// Basename without its final extension (`.meta.asc` gives `.meta`).
    pub fn stem(&self) -> &str {
        Path::new(&self.basename).file_stem().and_then(|s| s.to_str()).unwrap_or(&self.basename)
    }
}

/// Every regular file under `dir`, depth-first in file-name order.
///
/// Entries that cannot be read are logged and skipped; only a missing or
/// unlistable `dir` is an error.
pub(crate) fn files(dir: &Path) -> Result<Vec<Entry>> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "Not a directory");
        exn::bail!(ErrorKind::Walk);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            },
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let basename = entry.file_name().to_string_lossy().into_owned();
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path()).to_path_buf();
        files.push(Entry { path: entry.into_path(), relative, basename });
    }
    Ok(files)
}

/// Uppercase hexadecimal SHA-256 of a file's contents.
pub(crate) fn digest(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hex::encode_upper(hasher.finalize()))
}

/// Whether the file is a raster image the decoder understands.
///
/// The format is guessed from the content, not the extension, and only the
/// header is decoded.
pub(crate) fn is_image(path: &Path) -> bool {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map(|reader| reader.into_dimensions().is_ok())
        .unwrap_or(false)
}
