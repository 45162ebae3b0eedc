//! Deleting known promotional inserts and known duplicate files from an
//! extracted archive.
//!
//! Every operation walks the directory itself, so they can run in any order.
//! Reported paths are relative to the directory that was walked. A file that
//! cannot be hashed or deleted is logged and skipped.

use crate::error::Result;
use crate::walk::{self, Entry};
use cbnorm_config::Registry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Basename of the signature file Comixology bundles into its downloads.
pub const COMIXOLOGY_META: &str = ".meta.asc";

/// A file deleted because its content matched a known hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashRemoval {
    pub path: PathBuf,
    /// Uppercase hexadecimal SHA-256 digest.
    pub digest: String,
    /// Registry description of the known file.
    pub description: String,
}

/// Result of [`remove_known_promos`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PromoRemoval {
    /// `true` iff at least one known promo was deleted.
    pub found: bool,
    pub removed: Vec<PathBuf>,
    /// Possible promos, reported for review only. Populated only when
    /// nothing was found.
    pub candidates: Vec<String>,
}

/// Delete every file whose SHA-256 digest is a known hash.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn remove_hash_duplicates(dir: &Path, registry: &Registry) -> Result<Vec<HashRemoval>> {
    let mut removed = Vec::new();
    for entry in walk::files(dir)? {
        let digest = match walk::digest(&entry.path) {
            Ok(digest) => digest,
            Err(e) => {
                tracing::warn!(path = %entry.path.display(), error = %e, "Skipping unreadable file");
                continue;
            },
        };
        let Some(description) = registry.hashed_file(&digest) else {
            continue;
        };
        if delete(&entry) {
            tracing::info!(path = %entry.relative.display(), %description, %digest, "Removed known hashed file");
            removed.push(HashRemoval { path: entry.relative, digest, description: description.to_string() });
        }
    }
    Ok(removed)
}

/// Delete every file whose basename, without extension, is a known scene
/// group.
///
/// When nothing is deleted the [possible promos](possible_promos) of the
/// directory are attached to the result; they are never deleted.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn remove_known_promos(dir: &Path, registry: &Registry) -> Result<PromoRemoval> {
    let mut removed = Vec::new();
    for entry in walk::files(dir)? {
        if registry.is_scene_group(entry.stem()) && delete(&entry) {
            tracing::info!(path = %entry.relative.display(), promo = entry.stem(), "Removed promo");
            removed.push(entry.relative);
        }
    }
    if !removed.is_empty() {
        return Ok(PromoRemoval { found: true, removed, candidates: Vec::new() });
    }
    let candidates = possible_promos(dir, registry)?;
    tracing::info!(candidates = %candidates.join(" "), "No known promos found");
    Ok(PromoRemoval { found: false, removed, candidates })
}

/// Names (extension stripped) of files whose basename is shorter than the
/// mean basename length of all non-metadata files.
///
/// Advisory only: nothing is modified. A directory with no non-metadata files
/// has no candidates.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn possible_promos(dir: &Path, registry: &Registry) -> Result<Vec<String>> {
    let files: Vec<_> = walk::files(dir)?.into_iter().filter(|e| !registry.is_metadata_file(&e.basename)).collect();
    if files.is_empty() {
        return Ok(Vec::new());
    }
    let length = |entry: &Entry| entry.basename.chars().count();
    let mean = files.iter().map(length).sum::<usize>() as f64 / files.len() as f64;
    let candidates = files.iter().filter(|&e| (length(e) as f64) < mean).map(|e| e.stem().to_string()).collect();
    Ok(candidates)
}

/// Delete Comixology `.meta.asc` signature files.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn remove_comixology_meta(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for entry in walk::files(dir)? {
        if entry.basename == COMIXOLOGY_META && delete(&entry) {
            tracing::info!(path = %entry.relative.display(), "Removed Comixology meta file");
            removed.push(entry.relative);
        }
    }
    Ok(removed)
}

fn delete(entry: &Entry) -> bool {
    match fs::remove_file(&entry.path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %entry.path.display(), error = %e, "Failed to delete file; skipping");
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{BANNER, CREDITS_PAGE, jpeg, registry, snapshot};
    use std::fs;

    #[test]
    fn test_hash_removal_exactness() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("banner.png"), BANNER).unwrap();
        fs::create_dir(dir.path().join("extras")).unwrap();
        fs::write(dir.path().join("extras/credits.txt"), CREDITS_PAGE).unwrap();
        for n in 1..=3 {
            jpeg(&dir.path().join(format!("page{n:02}.jpg")));
        }
        fs::write(dir.path().join("notes.txt"), b"unrelated").unwrap();

        let mut removed = remove_hash_duplicates(dir.path(), &registry()).unwrap();
        removed.sort_by(|a, b| a.path.cmp(&b.path));
        let paths: Vec<_> = removed.iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("banner.png"), PathBuf::from("extras/credits.txt")]);
        assert_eq!(removed[0].description, "Scanner banner");
        assert!(removed[0].digest.chars().all(|c| !c.is_ascii_lowercase()));

        let remaining: Vec<_> = snapshot(dir.path()).into_keys().collect();
        assert_eq!(
            remaining,
            vec![
                PathBuf::from("notes.txt"),
                PathBuf::from("page01.jpg"),
                PathBuf::from("page02.jpg"),
                PathBuf::from("page03.jpg"),
            ]
        );
    }

    #[test]
    fn test_hash_removal_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("banner.png"), BANNER).unwrap();
        assert!(remove_hash_duplicates(dir.path(), &Registry::new()).unwrap().is_empty());
        assert!(dir.path().join("banner.png").exists());
    }

    #[test]
    fn test_promo_removal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        jpeg(&dir.path().join("page01.jpg"));
        jpeg(&dir.path().join("TeamX-release.jpg"));

        let first = remove_known_promos(dir.path(), &registry()).unwrap();
        assert!(first.found);
        assert_eq!(first.removed, vec![PathBuf::from("TeamX-release.jpg")]);
        assert!(first.candidates.is_empty());

        let before = snapshot(dir.path());
        let second = remove_known_promos(dir.path(), &registry()).unwrap();
        assert!(!second.found);
        assert!(second.removed.is_empty());
        assert_eq!(snapshot(dir.path()), before);
    }

    #[test]
    fn test_promo_match_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        jpeg(&dir.path().join("teamx-RELEASE.png"));
        assert!(remove_known_promos(dir.path(), &registry()).unwrap().found);
    }

    #[test]
    fn test_possible_promos_reported_when_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ComicInfo.xml"), "<ComicInfo/>").unwrap();
        for name in ["Saga 001 - page 01.jpg", "Saga 001 - page 02.jpg", "zzz.jpg"] {
            jpeg(&dir.path().join(name));
        }
        let before = snapshot(dir.path());
        let result = remove_known_promos(dir.path(), &registry()).unwrap();
        assert!(!result.found);
        assert_eq!(result.candidates, vec!["zzz"]);
        assert_eq!(snapshot(dir.path()), before);
    }

    #[test]
    fn test_possible_promos_never_mutates() {
        let dir = tempfile::tempdir().unwrap();
        jpeg(&dir.path().join("a.jpg"));
        jpeg(&dir.path().join("TeamX-release.jpg"));
        fs::write(dir.path().join("scanner-banner.png"), BANNER).unwrap();
        let before = snapshot(dir.path());
        let candidates = possible_promos(dir.path(), &registry()).unwrap();
        assert_eq!(candidates, vec!["a"]);
        assert_eq!(snapshot(dir.path()), before);
    }

    #[test]
    fn test_possible_promos_strictly_shorter() {
        let dir = tempfile::tempdir().unwrap();
        jpeg(&dir.path().join("one.jpg"));
        jpeg(&dir.path().join("two.jpg"));
        assert!(possible_promos(dir.path(), &registry()).unwrap().is_empty());
    }

    #[test]
    fn test_possible_promos_zero_division_guard() {
        let empty = tempfile::tempdir().unwrap();
        assert!(possible_promos(empty.path(), &registry()).unwrap().is_empty());

        let metadata_only = tempfile::tempdir().unwrap();
        fs::write(metadata_only.path().join("ComicInfo.xml"), "<ComicInfo/>").unwrap();
        assert!(possible_promos(metadata_only.path(), &registry()).unwrap().is_empty());
        let result = remove_known_promos(metadata_only.path(), &registry()).unwrap();
        assert!(!result.found);
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_remove_comixology_meta() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join(COMIXOLOGY_META), b"sig").unwrap();
        fs::write(dir.path().join("sub").join(COMIXOLOGY_META), b"sig").unwrap();
        fs::write(dir.path().join("meta.asc"), b"keep").unwrap();
        let removed = remove_comixology_meta(dir.path()).unwrap();
        assert_eq!(removed, vec![PathBuf::from(COMIXOLOGY_META), PathBuf::from("sub").join(COMIXOLOGY_META)]);
        assert!(dir.path().join("meta.asc").exists());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(remove_known_promos(&missing, &registry()).is_err());
        assert!(remove_hash_duplicates(&missing, &registry()).is_err());
    }
}
