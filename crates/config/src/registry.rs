//! The registry of known files.
//!
//! Loaded once at startup from a JSON side file and never mutated afterwards,
//! so a single `Arc<Registry>` can be shared by every concurrently processed
//! archive:
//!
//! ```json
//! {
//!   "scene_groups": ["TeamX-release"],
//!   "metadata_files": ["ComicInfo.xml"],
//!   "hashed_files": { "<SHA256-HEX-UPPER>": "Scanner credits page" }
//! }
//! ```
//!
//! Every key is optional and defaults to an empty collection. Absence from a
//! collection means "unknown", never "excluded".

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Format, Json};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::instrument;

const SCENE_GROUPS: &str = "scene_groups";
const METADATA_FILES: &str = "metadata_files";
const HASHED_FILES: &str = "hashed_files";

/// Immutable lookup tables used to classify archive contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    /// Case-folded basenames (extension removed) of known promotional inserts.
    scene_groups: HashSet<String>,
    /// Exact filenames recognised as metadata descriptors.
    metadata_files: HashSet<String>,
    /// Uppercase hex SHA-256 digest to human-readable description.
    hashed_files: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRegistry {
    scene_groups: Vec<String>,
    metadata_files: Vec<String>,
    hashed_files: HashMap<String, String>,
}
impl From<RawRegistry> for Registry {
    fn from(raw: RawRegistry) -> Self {
        let registry = Registry::new();
        let registry = raw.scene_groups.into_iter().fold(registry, Registry::with_scene_group);
        let registry = raw.metadata_files.into_iter().fold(registry, Registry::with_metadata_file);
        raw.hashed_files.into_iter().fold(registry, |r, (digest, description)| r.with_hashed_file(digest, description))
    }
}

impl Registry {
    /// An empty registry: nothing is known, so nothing is ever removed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from a JSON side file, never failing.
    ///
    /// - a missing file yields an empty registry,
    /// - an unreadable or malformed file yields an empty registry (and a warning),
    /// - each key is read independently; a missing key yields an empty
    ///   collection, a malformed key an empty collection (and a warning).
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Registry file not found; continuing with an empty registry");
            return Self::new();
        }
        let figment = Figment::from(Json::file_exact(path));
        if let Err(e) = figment.extract::<figment::value::Dict>() {
            tracing::warn!(error = %e, "Registry file is unreadable; continuing with an empty registry");
            return Self::new();
        }
        let raw = RawRegistry {
            scene_groups: lenient_key(&figment, SCENE_GROUPS),
            metadata_files: lenient_key(&figment, METADATA_FILES),
            hashed_files: lenient_key(&figment, HASHED_FILES),
        };
        let registry = Self::from(raw);
        tracing::info!(
            scene_groups = registry.scene_groups.len(),
            metadata_files = registry.metadata_files.len(),
            hashed_files = registry.hashed_files.len(),
            "Registry loaded"
        );
        registry
    }

    /// Load the registry from a JSON side file, failing if the file exists but
    /// any part of it is malformed. A missing file is still an empty registry.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw: RawRegistry =
            Figment::from(Json::file_exact(path)).extract().or_raise(|| ErrorKind::Registry(path.to_path_buf()))?;
        Ok(raw.into())
    }

    pub fn with_scene_group(mut self, name: impl AsRef<str>) -> Self {
        self.scene_groups.insert(fold_scene_group(name.as_ref()));
        self
    }

    pub fn with_metadata_file(mut self, name: impl Into<String>) -> Self {
        self.metadata_files.insert(name.into());
        self
    }

    pub fn with_hashed_file(mut self, digest: impl AsRef<str>, description: impl Into<String>) -> Self {
        self.hashed_files.insert(digest.as_ref().trim().to_uppercase(), description.into());
        self
    }

    /// Whether a basename with its extension removed names a known promo.
    pub fn is_scene_group(&self, stem: &str) -> bool {
        self.scene_groups.contains(&fold_scene_group(stem))
    }

    /// Whether a filename is a recognised metadata descriptor.
    pub fn is_metadata_file(&self, name: &str) -> bool {
        self.metadata_files.contains(name)
    }

    /// Description of a known file, looked up by its SHA-256 hex digest (any case).
    pub fn hashed_file(&self, digest: &str) -> Option<&str> {
        match self.hashed_files.get(digest) {
            Some(description) => Some(description.as_str()),
            None => self.hashed_files.get(&digest.to_uppercase()).map(String::as_str),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scene_groups.is_empty() && self.metadata_files.is_empty() && self.hashed_files.is_empty()
    }
}

fn fold_scene_group(name: &str) -> String {
    name.trim().to_lowercase()
}

fn lenient_key<T: DeserializeOwned + Default>(figment: &Figment, key: &str) -> T {
    if !figment.contains(key) {
        return T::default();
    }
    match figment.extract_inner(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring malformed registry key");
            T::default()
        },
    }
}
