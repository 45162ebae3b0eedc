use crate::error::{ErrorKind, Result};
use cbnorm_archive::{DEFAULT_ZOOM, RenderOptions};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "CBNORM_";
const SETTINGS_FILE: &str = "cbnorm.toml";
const DEFAULT_REGISTRY: &str = "comicutil.json";
const DEFAULT_CONCURRENCY: usize = 4;

/// Application settings.
///
/// Layered, lowest priority first: built-in defaults, a TOML file, then
/// environment variables prefixed with `CBNORM_` (e.g. `CBNORM_PDF_ZOOM=3`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Location of the JSON registry side file.
    pub registry: PathBuf,
    /// Rasterization zoom passed to extraction of page-based formats.
    pub pdf_zoom: f32,
    /// Maximum number of archives processed at the same time.
    pub concurrency: usize,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            registry: PathBuf::from(DEFAULT_REGISTRY),
            pdf_zoom: DEFAULT_ZOOM,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}
impl Settings {
    /// Load settings from `explicit` (which must exist), or from the platform
    /// configuration directory when no path is given (skipped when absent).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.is_file()),
        };
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(file) = &file {
            tracing::debug!(path = %file.display(), "Reading settings file");
            figment = figment.merge(Toml::file_exact(file));
        }
        let settings: Settings = figment.merge(Env::prefixed(ENV_PREFIX)).extract().or_raise(|| ErrorKind::Settings)?;
        if settings.concurrency == 0 || !(settings.pdf_zoom.is_finite() && settings.pdf_zoom > 0.0) {
            exn::bail!(ErrorKind::Settings);
        }
        Ok(settings)
    }

    /// `cbnorm.toml` inside the platform-specific configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "cbnorm").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.pdf_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;
    use std::ops::Deref;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.registry, PathBuf::from("comicutil.json"));
        assert_eq!(settings.pdf_zoom, 2.0);
        assert_eq!(settings.concurrency, 4);
        assert_eq!(settings.render_options(), RenderOptions::new(2.0));
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file("cbnorm.toml", "registry = \"known.json\"\nconcurrency = 2\n")?;
            jail.set_env("CBNORM_CONCURRENCY", "8");
            let settings = Settings::load(Some(Path::new("cbnorm.toml"))).unwrap();
            assert_eq!(settings.registry, PathBuf::from("known.json"));
            assert_eq!(settings.concurrency, 8);
            assert_eq!(settings.pdf_zoom, 2.0);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        Jail::expect_with(|jail| {
            let home = jail.directory().to_path_buf();
            jail.set_env("HOME", home.display());
            jail.set_env("XDG_CONFIG_HOME", home.join("config").display());
            assert!(!Settings::default_path().is_some_and(|path| path.exists()));
            assert_eq!(Settings::load(None).unwrap(), Settings::default());
            Ok(())
        });
    }

    #[test]
    fn test_default_file_is_read() {
        Jail::expect_with(|jail| {
            let home = jail.directory().to_path_buf();
            jail.set_env("HOME", home.display());
            jail.set_env("XDG_CONFIG_HOME", home.join("config").display());
            let Some(path) = Settings::default_path() else {
                return Ok(());
            };
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "concurrency = 3\n").unwrap();
            assert_eq!(Settings::load(None).unwrap().concurrency, 3);
            Ok(())
        });
    }

    #[rstest]
    #[case::zero_concurrency("concurrency = 0\n")]
    #[case::zero_zoom("pdf_zoom = 0.0\n")]
    #[case::negative_zoom("pdf_zoom = -1.5\n")]
    #[case::nan_zoom("pdf_zoom = nan\n")]
    #[case::infinite_zoom("pdf_zoom = inf\n")]
    fn test_invalid_values_rejected(#[case] contents: &str) {
        Jail::expect_with(|jail| {
            jail.create_file("cbnorm.toml", contents)?;
            let err = Settings::load(Some(Path::new("cbnorm.toml"))).unwrap_err();
            assert!(matches!(err.deref(), ErrorKind::Settings));
            Ok(())
        });
    }
}
