//! Writing and updating the ComicInfo.xml descriptor of an extracted archive.

use crate::classify::Classification;
use crate::error::{ErrorKind, Result};
use cbnorm_metadata::{GenericMetadata, Priority, comicinfo, merge_tracked};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Metadata document to merge into an archive's descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataOverlay {
    /// ComicInfo.xml text.
    pub xml: String,
    /// Which side wins when both documents define an element.
    pub priority: Priority,
}
impl MetadataOverlay {
    pub fn new(xml: impl Into<String>, priority: Priority) -> Self {
        Self { xml: xml.into(), priority }
    }
}

/// Write `metadata` as `ComicInfo.xml` at the top of `dir`.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn write_metadata_to_dir(metadata: &GenericMetadata, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(comicinfo::FILENAME);
    comicinfo::write_file(metadata, &path).or_raise(|| ErrorKind::Metadata)?;
    tracing::debug!(path = %path.display(), "Metadata descriptor written");
    Ok(path)
}

/// Merge `overlay` into the workspace descriptor, creating one at the top of
/// `dir` when the classification found none.
///
/// Returns the updated metadata, or `None` when the descriptor is unchanged
/// (and was therefore not rewritten).
pub(crate) fn apply_overlay(
    dir: &Path,
    classification: &Classification,
    overlay: &MetadataOverlay,
) -> Result<Option<GenericMetadata>> {
    let (path, existing) = match classification.find(comicinfo::FILENAME) {
        Some(file) => {
            let path = dir.join(&file.path);
            let existing = fs::read_to_string(&path).or_raise(|| ErrorKind::Io)?;
            (path, existing)
        },
        None => (dir.join(comicinfo::FILENAME), String::from("<ComicInfo/>")),
    };
    // Arguments are (base, overlay): the workspace copy is always the base.
    let merged = merge_tracked(&existing, &overlay.xml, overlay.priority).or_raise(|| ErrorKind::Metadata)?;
    if !merged.changed {
        tracing::debug!(path = %path.display(), "Metadata overlay changed nothing");
        return Ok(None);
    }
    let metadata = comicinfo::parse(&merged.xml).or_raise(|| ErrorKind::Metadata)?;
    fs::write(&path, merged.xml).or_raise(|| ErrorKind::Io)?;
    tracing::info!(path = %path.display(), priority = %overlay.priority, "Metadata descriptor updated");
    Ok(Some(metadata))
}
