use crate::classify::{ClassifiedFile, classify};
use crate::descriptor::{MetadataOverlay, apply_overlay};
use crate::error::{ErrorKind, Result};
use crate::remove::{HashRemoval, PromoRemoval, remove_comixology_meta, remove_hash_duplicates, remove_known_promos};
use cbnorm_archive::{ArchiverHandle, RenderOptions, Workspace};
use cbnorm_config::Registry;
use cbnorm_metadata::GenericMetadata;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// The mutations to apply to each archive.
///
/// Every operation is independent; an empty set only classifies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Operations {
    /// Delete files matching a known hash.
    pub hash_duplicates: bool,
    /// Delete known scene-group promos.
    pub promos: bool,
    /// Delete Comixology `.meta.asc` files.
    pub comixology: bool,
    /// Merge a metadata document into the archive's ComicInfo.xml.
    pub metadata: Option<MetadataOverlay>,
}
impl Operations {
    /// Every removal, without a metadata overlay.
    pub fn all() -> Self {
        Self { hash_duplicates: true, promos: true, comixology: true, metadata: None }
    }

    pub fn with_hash_duplicates(mut self) -> Self {
        self.hash_duplicates = true;
        self
    }

    pub fn with_promos(mut self) -> Self {
        self.promos = true;
        self
    }

    pub fn with_comixology(mut self) -> Self {
        self.comixology = true;
        self
    }

    pub fn with_metadata(mut self, overlay: MetadataOverlay) -> Self {
        self.metadata = Some(overlay);
        self
    }
}

/// What processing one archive found and did.
///
/// Paths are relative to the archive root.
#[derive(Clone, Debug, Default)]
pub struct Report {
    /// The archive's metadata, after any overlay was merged in.
    pub metadata: GenericMetadata,
    /// Classification of the archive as extracted, before any mutation.
    pub files: Vec<ClassifiedFile>,
    pub hash_removals: Vec<HashRemoval>,
    /// `None` unless promo removal was requested.
    pub promos: Option<PromoRemoval>,
    pub comixology: Vec<PathBuf>,
    pub metadata_changed: bool,
}
impl Report {
    /// Whether any operation changed the archive contents.
    pub fn changed(&self) -> bool {
        !self.hash_removals.is_empty()
            || self.promos.as_ref().is_some_and(|promos| promos.found)
            || !self.comixology.is_empty()
            || self.metadata_changed
    }
}

/// The result of successfully processing one archive.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// The archive was rebuilt with the changes applied.
    Repacked(Report),
    /// Nothing changed; the archive was not touched.
    Unchanged(Report),
}
impl Outcome {
    pub fn report(&self) -> &Report {
        match self {
            Self::Repacked(report) | Self::Unchanged(report) => report,
        }
    }

    pub fn into_report(self) -> Report {
        match self {
            Self::Repacked(report) | Self::Unchanged(report) => report,
        }
    }

    pub fn is_repacked(&self) -> bool {
        matches!(self, Self::Repacked(_))
    }
}

/// Everything needed to process archives: the shared registry, the archive
/// collaborator and the rendering parameters passed to it.
///
/// Cheap to clone; clones share the registry and archiver.
#[derive(Clone)]
pub struct Pipeline {
    registry: Arc<Registry>,
    archiver: ArchiverHandle,
    render: RenderOptions,
}
impl Pipeline {
    pub fn new(registry: Arc<Registry>, archiver: ArchiverHandle) -> Self {
        Self { registry, archiver, render: RenderOptions::default() }
    }

    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Extract `archive`, apply `ops` to the extracted files and repack the
    /// archive if anything changed.
    ///
    /// # Errors
    /// Fails with [`ErrorKind::Extract`], [`ErrorKind::Process`] or
    /// [`ErrorKind::Repack`] depending on the stage that failed. In every
    /// case the archive is left as it was and the workspace is deleted.
    #[instrument(skip_all, fields(archive = %archive.display()))]
    pub fn process(&self, archive: &Path, ops: &Operations) -> Result<Outcome> {
        let workspace =
            self.archiver.extract(archive, &self.render).or_raise(|| ErrorKind::Extract(archive.to_path_buf()))?;
        // Any early return from here on drops the workspace, deleting it.
        let report = self.transform(workspace.path(), ops).or_raise(|| ErrorKind::Process(archive.to_path_buf()))?;
        if !report.changed() {
            tracing::info!("Nothing to change; archive left as is");
            discard(workspace);
            return Ok(Outcome::Unchanged(report));
        }
        self.archiver.repack(&workspace, archive).or_raise(|| ErrorKind::Repack(archive.to_path_buf()))?;
        discard(workspace);
        tracing::info!(
            hash_removals = report.hash_removals.len(),
            promos = report.promos.as_ref().map_or(0, |promos| promos.removed.len()),
            comixology = report.comixology.len(),
            metadata_changed = report.metadata_changed,
            "Archive repacked"
        );
        Ok(Outcome::Repacked(report))
    }

    fn transform(&self, dir: &Path, ops: &Operations) -> Result<Report> {
        let classification = classify(dir, &self.registry)?;
        // The overlay goes first so the descriptor located by classification
        // still exists when it is merged into.
        let updated = match &ops.metadata {
            Some(overlay) => apply_overlay(dir, &classification, overlay)?,
            None => None,
        };
        let mut report = Report {
            metadata_changed: updated.is_some(),
            metadata: updated.unwrap_or(classification.metadata),
            files: classification.files,
            ..Report::default()
        };
        if ops.hash_duplicates {
            report.hash_removals = remove_hash_duplicates(dir, &self.registry)?;
        }
        if ops.promos {
            report.promos = Some(remove_known_promos(dir, &self.registry)?);
        }
        if ops.comixology {
            report.comixology = remove_comixology_meta(dir)?;
        }
        Ok(report)
    }
}

fn discard(workspace: Workspace) {
    let path = workspace.path().to_path_buf();
    if let Err(e) = workspace.close() {
        tracing::warn!(workspace = %path.display(), error = ?e, "Failed to delete workspace");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{BANNER, jpeg_bytes, registry, write_zip, zip_entries};
    use cbnorm_archive::error::{ErrorKind as ArchiveErrorKind, Result as ArchiveResult};
    use cbnorm_archive::{Archiver, ZipArchiver};
    use cbnorm_metadata::Priority;
    use std::fs;
    use std::ops::Deref;
    use std::sync::Mutex;

    const COMIC_INFO: &[u8] = b"<ComicInfo><Series>Saga</Series><Number>1</Number></ComicInfo>";

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(registry()), Arc::new(ZipArchiver::new()))
    }

    fn issue(dir: &Path) -> PathBuf {
        let archive = dir.join("issue.cbz");
        let page = jpeg_bytes();
        write_zip(&archive, &[("ComicInfo.xml", COMIC_INFO), ("page01.jpg", &page[..]), ("TeamX-release.jpg", &page[..])]);
        archive
    }

    /// Extracts for real but always fails to repack, remembering the
    /// workspace it was handed.
    #[derive(Default)]
    struct FailingRepack {
        inner: ZipArchiver,
        workspace: Mutex<Option<PathBuf>>,
    }
    impl Archiver for FailingRepack {
        fn extract(&self, archive: &Path, render: &RenderOptions) -> ArchiveResult<Workspace> {
            self.inner.extract(archive, render)
        }

        fn repack(&self, workspace: &Workspace, _archive: &Path) -> ArchiveResult<()> {
            *self.workspace.lock().unwrap() = Some(workspace.path().to_path_buf());
            exn::bail!(ArchiveErrorKind::Io)
        }
    }

    #[test]
    fn test_end_to_end_promo_removal() {
        let dir = tempfile::tempdir().unwrap();
        let archive = issue(dir.path());

        let outcome = pipeline().process(&archive, &Operations::default().with_promos()).unwrap();
        assert!(outcome.is_repacked());
        let report = outcome.report();
        assert!(report.promos.as_ref().unwrap().found);
        assert_eq!(report.metadata.series.as_deref(), Some("Saga"));
        assert_eq!(report.files.len(), 3);
        assert_eq!(zip_entries(&archive), vec!["ComicInfo.xml", "page01.jpg"]);
    }

    #[test]
    fn test_second_run_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let archive = issue(dir.path());
        let ops = Operations::default().with_promos();
        pipeline().process(&archive, &ops).unwrap();
        let before = fs::read(&archive).unwrap();

        let outcome = pipeline().process(&archive, &ops).unwrap();
        assert!(!outcome.is_repacked());
        assert!(!outcome.report().promos.as_ref().unwrap().found);
        assert_eq!(fs::read(&archive).unwrap(), before);
    }

    #[test]
    fn test_nothing_requested_leaves_archive_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let archive = issue(dir.path());
        let before = fs::read(&archive).unwrap();
        let outcome = pipeline().process(&archive, &Operations::default()).unwrap();
        assert!(matches!(outcome, Outcome::Unchanged(_)));
        assert_eq!(fs::read(&archive).unwrap(), before);
    }

    #[test]
    fn test_failed_repack_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let archive = issue(dir.path());
        let before = fs::read(&archive).unwrap();
        let archiver = Arc::new(FailingRepack::default());
        let pipeline = Pipeline::new(Arc::new(registry()), archiver.clone());

        let err = pipeline.process(&archive, &Operations::all()).unwrap_err();
        assert_eq!(err.deref(), &ErrorKind::Repack(archive.clone()));
        assert_eq!(fs::read(&archive).unwrap(), before);
        let workspace = archiver.workspace.lock().unwrap().clone().unwrap();
        assert!(!workspace.exists());
    }

    #[test]
    fn test_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.cbz");
        fs::write(&archive, b"PK\x03\x04 but not really a zip").unwrap();
        let err = pipeline().process(&archive, &Operations::all()).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::Extract(path) if path == &archive));
        assert_eq!(fs::read(&archive).unwrap(), b"PK\x03\x04 but not really a zip");
    }

    #[test]
    fn test_processing_failure_keeps_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = issue(dir.path());
        let before = fs::read(&archive).unwrap();
        let ops = Operations::all().with_metadata(MetadataOverlay::new("<ComicInfo>", Priority::Overlay));
        let err = pipeline().process(&archive, &ops).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::Process(_)));
        assert_eq!(fs::read(&archive).unwrap(), before);
    }

    #[test]
    fn test_metadata_overlay_repacks() {
        let dir = tempfile::tempdir().unwrap();
        let archive = issue(dir.path());
        let overlay = MetadataOverlay::new("<ComicInfo><Number>2</Number></ComicInfo>", Priority::Overlay);
        let outcome = pipeline().process(&archive, &Operations::default().with_metadata(overlay)).unwrap();
        assert!(outcome.is_repacked());
        let report = outcome.into_report();
        assert!(report.metadata_changed);
        assert_eq!(report.metadata.issue.as_deref(), Some("2"));
        assert_eq!(zip_entries(&archive), vec!["ComicInfo.xml", "TeamX-release.jpg", "page01.jpg"]);
    }

    #[test]
    fn test_clean_removes_everything_known() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("clean.cbz");
        let page = jpeg_bytes();
        write_zip(
            &archive,
            &[
                ("page01.jpg", &page[..]),
                ("banner.png", BANNER),
                (".meta.asc", &b"signature"[..]),
                ("TeamX-release.jpg", &page[..]),
            ],
        );
        let outcome = pipeline().process(&archive, &Operations::all()).unwrap();
        let report = outcome.report();
        assert_eq!(report.hash_removals.len(), 1);
        assert_eq!(report.comixology, vec![PathBuf::from(".meta.asc")]);
        assert_eq!(zip_entries(&archive), vec!["page01.jpg"]);
    }
}
