//! Tagging the files of an extracted archive.

use crate::error::Result;
use crate::walk::{self, Entry};
use cbnorm_config::Registry;
use cbnorm_metadata::{GenericMetadata, comicinfo};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// What a file inside an archive is, checked in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// A metadata descriptor listed in the registry.
    Metadata,
    /// A release-group insert whose name is a known scene group.
    KnownPromo,
    /// Content matching a known file hash.
    HashDuplicate,
    /// Decodes as a raster image; an ordinary page.
    Image,
    Other,
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Metadata => "metadata",
            Self::KnownPromo => "known-promo",
            Self::HashDuplicate => "hash-duplicate",
            Self::Image => "image",
            Self::Other => "other",
        };
        f.pad(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedFile {
    /// Path relative to the classified directory.
    pub path: PathBuf,
    pub basename: String,
    pub category: Category,
}

/// Result of [`classify`].
#[derive(Clone, Debug, Default)]
pub struct Classification {
    /// Parsed from the first ComicInfo.xml found; empty when there is none or
    /// it could not be parsed.
    pub metadata: GenericMetadata,
    pub files: Vec<ClassifiedFile>,
}
impl Classification {
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &ClassifiedFile> {
        self.files.iter().filter(move |file| file.category == category)
    }

    /// The classified file with the given basename, if any.
    pub fn find(&self, basename: &str) -> Option<&ClassifiedFile> {
        self.files.iter().find(|file| file.basename == basename)
    }
}

/// Walk `dir` recursively and tag every file.
///
/// The directory is never modified. Files that cannot be read are logged and
/// left out of the result rather than failing the walk.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn classify(dir: &Path, registry: &Registry) -> Result<Classification> {
    let mut classification = Classification::default();
    let mut parsed_descriptor = false;
    for entry in walk::files(dir)? {
        let Some(category) = categorize(&entry, registry) else {
            continue;
        };
        if category == Category::Metadata && entry.basename == comicinfo::FILENAME && !parsed_descriptor {
            classification.metadata = read_descriptor(&entry.path);
            parsed_descriptor = true;
        }
        tracing::trace!(path = %entry.relative.display(), %category, "Classified");
        classification.files.push(ClassifiedFile { path: entry.relative, basename: entry.basename, category });
    }
    tracing::debug!(files = classification.files.len(), "Directory classified");
    Ok(classification)
}

/// `None` when the file could not be read.
fn categorize(entry: &Entry, registry: &Registry) -> Option<Category> {
    if registry.is_metadata_file(&entry.basename) {
        return Some(Category::Metadata);
    }
    if registry.is_scene_group(entry.stem()) {
        return Some(Category::KnownPromo);
    }
    let digest = match walk::digest(&entry.path) {
        Ok(digest) => digest,
        Err(e) => {
            tracing::warn!(path = %entry.path.display(), error = %e, "Skipping unreadable file");
            return None;
        },
    };
    if registry.hashed_file(&digest).is_some() {
        return Some(Category::HashDuplicate);
    }
    match walk::is_image(&entry.path) {
        true => Some(Category::Image),
        false => Some(Category::Other),
    }
}

fn read_descriptor(path: &Path) -> GenericMetadata {
    comicinfo::read_file(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = ?e, "Unreadable metadata descriptor; treating as empty");
        GenericMetadata::default()
    })
}

/// The first image under `dir` in walk order, as a full path.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn cover_from_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let cover = walk::files(dir)?.into_iter().map(|entry| entry.path).find(|path| walk::is_image(path));
    tracing::debug!(cover = ?cover, "Cover lookup finished");
    Ok(cover)
}
