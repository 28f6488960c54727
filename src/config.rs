//! Build configuration file module.
//!
//! Reads the project's `Build.json`, which lives at the fixed relative path
//! `../Config/Build.json` next to the packaging scripts. The file carries
//! more than the Steam settings; this tool only consumes `outputDir` and the
//! `steam` section and leaves the rest alone.
//!
//! The config path intentionally stays relative rather than being resolved
//! through platform config directories: the tool is meant to run from the
//! project's `Scripts/` directory, and the path is part of its contract.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::UploadError;

/// Fixed directory holding `Build.json`, relative to the invocation cwd.
pub const CONFIG_DIR: &str = "../Config";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE_NAME: &str = "Build.json";

/// Sentinel spelling of an unset `outputDir`. Some configs carry the
/// literal string instead of `null`; both mean unset.
const OUTPUT_DIR_UNSET_SENTINEL: &str = "None";

/// The subset of `Build.json` consumed by the upload orchestrator.
///
/// Unknown fields are ignored so the same file can serve other packaging
/// steps.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Directory holding the packaged builds. `null`, absent, or the literal
    /// string `"None"` all mean unset; [`BuildConfig::configured_output_dir`]
    /// normalizes them.
    #[serde(default)]
    pub output_dir: Option<String>,
    /// Steam upload settings.
    pub steam: SteamConfig,
}

/// The `steam` section: two order-significant collections of relative paths
/// to build-description files (VDF app-build scripts), one entry per
/// application/platform.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SteamConfig {
    pub apps: Vec<String>,
    pub demos: Vec<String>,
}

impl BuildConfig {
    /// Load `Build.json` from the given config directory.
    ///
    /// Production callers pass [`CONFIG_DIR`]; tests point this at a
    /// temporary directory.
    pub fn load(config_dir: &Path) -> Result<Self, UploadError> {
        Self::load_from(&config_dir.join(CONFIG_FILE_NAME))
    }

    /// Load config from a specific file path.
    fn load_from(path: &Path) -> Result<Self, UploadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| UploadError::ConfigNotFound {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&contents).map_err(|source| UploadError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The configured output directory, or `None` if unset.
    ///
    /// Filters the `"None"` sentinel and empty/whitespace-only values so
    /// callers only ever see a usable path.
    pub fn configured_output_dir(&self) -> Option<&str> {
        self.output_dir
            .as_deref()
            .map(str::trim)
            .filter(|dir| !dir.is_empty() && *dir != OUTPUT_DIR_UNSET_SENTINEL)
    }
}

/// The full path of the production config file: `../Config/Build.json`.
pub fn default_config_path() -> PathBuf {
    Path::new(CONFIG_DIR).join(CONFIG_FILE_NAME)
}
