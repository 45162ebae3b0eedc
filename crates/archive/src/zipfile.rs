//! Zip-based comic archives (`.cbz`, `.zip`).

use crate::construct::MAGIC_WINDOW;
use crate::error::{ErrorKind, Result};
use crate::path::{entry_name, validate as validate_path};
use crate::{ArchiveFormat, Archiver, RenderOptions, Workspace};
use ::zip::write::SimpleFileOptions;
use ::zip::{CompressionMethod, ZipArchive, ZipWriter};
use exn::ResultExt;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::instrument;
use walkdir::WalkDir;

const STAGING_PREFIX: &str = ".cbnorm-";
const STAGING_SUFFIX: &str = ".partial";

/// [`Archiver`] for zip containers.
///
/// Extraction writes every entry into a fresh [`Workspace`]. Repacking builds
/// the new archive in a staging file next to the original and renames it into
/// place once it has been fully written and synced, so a failed repack never
/// leaves a truncated archive behind.
#[derive(Clone, Debug)]
pub struct ZipArchiver {
    compression: CompressionMethod,
}
impl Default for ZipArchiver {
    fn default() -> Self {
        Self { compression: CompressionMethod::Deflated }
    }
}
impl ZipArchiver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Archiver for ZipArchiver {
    #[instrument(skip_all, fields(archive = %archive.display(), zoom = render.zoom))]
    fn extract(&self, archive: &Path, render: &RenderOptions) -> Result<Workspace> {
        let format = detect(archive)?;
        if format != ArchiveFormat::Zip {
            tracing::debug!(%format, zoom = render.zoom, "No extractor available for archive format");
            exn::bail!(ErrorKind::UnsupportedFormat(format.to_string()));
        }
        let file = File::open(archive).or_raise(|| ErrorKind::Io)?;
        let mut zip = ZipArchive::new(BufReader::new(file)).or_raise(|| ErrorKind::InvalidData)?;
        // Created only once the archive is known to be readable. Any failure
        // from here on drops the workspace, deleting the partial extraction.
        let workspace = Workspace::new()?;
        for index in 0..zip.len() {
            let mut entry = zip.by_index(index).or_raise(|| ErrorKind::InvalidData)?;
            let relative = match validate_path(entry.name()) {
                Err(e) if entry.is_dir() && matches!(*e, ErrorKind::EmptyEntryName(_)) => continue,
                result => result?,
            };
            let target = workspace.path().join(&relative);
            if entry.is_dir() {
                fs::create_dir_all(&target).or_raise(|| ErrorKind::Io)?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
            }
            let mut output = File::create(&target).or_raise(|| ErrorKind::Io)?;
            io::copy(&mut entry, &mut output).or_raise(|| ErrorKind::InvalidData)?;
        }
        tracing::debug!(entries = zip.len(), workspace = %workspace.path().display(), "Archive extracted");
        Ok(workspace)
    }

    #[instrument(skip_all, fields(archive = %archive.display(), workspace = %workspace.path().display()))]
    fn repack(&self, workspace: &Workspace, archive: &Path) -> Result<()> {
        let format = match archive.is_file() {
            true => detect(archive)?,
            false => ArchiveFormat::from_path(archive).unwrap_or(ArchiveFormat::Zip),
        };
        if format != ArchiveFormat::Zip {
            exn::bail!(ErrorKind::UnsupportedFormat(format.to_string()));
        }
        let parent = match archive.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        // Dropping the staging file before `persist` deletes it, which is
        // exactly what every early return below relies on.
        let mut staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(parent)
            .or_raise(|| ErrorKind::Io)?;
        let options = SimpleFileOptions::default().compression_method(self.compression);
        let mut writer = ZipWriter::new(staging.as_file_mut());
        let mut entries: usize = 0;
        for entry in WalkDir::new(workspace.path()).min_depth(1).sort_by_file_name() {
            let entry = entry.or_raise(|| ErrorKind::Io)?;
            let relative = entry
                .path()
                .strip_prefix(workspace.path())
                .or_raise(|| ErrorKind::InvalidPath(entry.path().to_path_buf()))?;
            let name = entry_name(relative)?;
            if entry.file_type().is_dir() {
                writer.add_directory(name, options).or_raise(|| ErrorKind::Io)?;
                continue;
            }
            writer.start_file(name, options).or_raise(|| ErrorKind::Io)?;
            let mut input = File::open(entry.path()).or_raise(|| ErrorKind::Io)?;
            io::copy(&mut input, &mut writer).or_raise(|| ErrorKind::Io)?;
            entries += 1;
        }
        writer.finish().or_raise(|| ErrorKind::Io)?;
        staging.as_file().sync_all().or_raise(|| ErrorKind::Io)?;
        if let Ok(meta) = fs::metadata(archive) {
            fs::set_permissions(staging.path(), meta.permissions()).or_raise(|| ErrorKind::Io)?;
        }
        staging.persist(archive).or_raise(|| ErrorKind::Io)?;
        tracing::debug!(entries, "Archive repacked");
        Ok(())
    }
}

/// Work out the format of an existing archive, trusting content over the
/// file extension.
fn detect(archive: &Path) -> Result<ArchiveFormat> {
    if !archive.is_file() {
        exn::bail!(ErrorKind::NotFound(archive.to_path_buf()));
    }
    let mut head = Vec::with_capacity(MAGIC_WINDOW);
    File::open(archive)
        .or_raise(|| ErrorKind::Io)?
        .take(MAGIC_WINDOW as u64)
        .read_to_end(&mut head)
        .or_raise(|| ErrorKind::Io)?;
    match (ArchiveFormat::from_magic_bytes(&head), ArchiveFormat::from_path(archive)) {
        (Some(content), Some(extension)) => {
            if !extension.check_magic_bytes(&head) {
                tracing::warn!(%content, %extension, "Archive extension does not match its contents");
            }
            Ok(content)
        },
        (Some(format), None) | (None, Some(format)) => Ok(format),
        (None, None) => {
            let extension = archive.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_default();
            exn::bail!(ErrorKind::UnsupportedFormat(extension))
        },
    }
}
