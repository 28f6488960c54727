//! Invocation-context resolution.
//!
//! Gathers everything a run needs (entry collection, output directory,
//! credentials, uploader executable) into an immutable [`UploadContext`]
//! before any external process is spawned. All validation happens here, so
//! a context that resolves successfully is guaranteed complete.

use std::path::PathBuf;

use crate::config::BuildConfig;
use crate::error::UploadError;

/// Environment variable holding the Steam username used for `+login`.
pub const STEAM_USER_ENV_VAR: &str = "STEAM_USER";

/// Environment variable holding the path to the Steam SDK builder directory.
pub const STEAM_BUILDER_ENV_VAR: &str = "STEAM_BUILDER";

/// Uploader executable shipped in the SDK's Windows `builder` directory.
const WINDOWS_UPLOADER: &str = "SteamCmd.exe";

/// Uploader wrapper script shipped in the SDK's Linux/macOS builder
/// directories (`builder_linux`, `builder_osx`).
const UNIX_UPLOADER: &str = "steamcmd.sh";

/// Literal CLI argument that switches the run to the demo entry collection.
pub const DEMO_MODE_ARG: &str = "demo";

/// Which of the two configured entry collections a run uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppSelection {
    #[default]
    Apps,
    Demos,
}

impl AppSelection {
    pub fn as_str(self) -> &'static str {
        match self {
            AppSelection::Apps => "apps",
            AppSelection::Demos => "demos",
        }
    }
}

/// Everything needed to run the configured uploads.
///
/// Constructed once per run by [`resolve`]; every field is validated
/// non-empty. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadContext {
    /// Which collection `builds` was taken from.
    pub selection: AppSelection,
    /// Relative build-description paths, in upload order.
    pub builds: Vec<String>,
    /// Directory holding the packaged builds. Validated here; the uploader
    /// locates the content through the build-description files themselves.
    pub output_dir: String,
    /// Steam SDK builder directory; the uploader runs with this as its cwd.
    pub builder_dir: PathBuf,
    /// Full path to the uploader executable inside `builder_dir`.
    pub uploader: PathBuf,
    /// Steam username passed to `+login`.
    pub user: String,
}

/// Resolve the upload context from the loaded config, the optional CLI
/// argument, and the process environment.
pub fn resolve(config: &BuildConfig, arg: Option<&str>) -> Result<UploadContext, UploadError> {
    resolve_with_env(
        config,
        arg,
        std::env::var(STEAM_USER_ENV_VAR).ok(),
        std::env::var(STEAM_BUILDER_ENV_VAR).ok(),
    )
}

/// Internal resolver that accepts the environment values as parameters for
/// testability.
///
/// The single CLI argument is overloaded: `demo` selects the demo
/// collection, and the same argument (whatever its value) doubles as the
/// output-directory override when the config leaves `outputDir` unset.
/// There is no way to supply both at once.
pub fn resolve_with_env(
    config: &BuildConfig,
    arg: Option<&str>,
    steam_user: Option<String>,
    steam_builder: Option<String>,
) -> Result<UploadContext, UploadError> {
    let selection = match arg {
        Some(DEMO_MODE_ARG) => AppSelection::Demos,
        _ => AppSelection::Apps,
    };
    let builds = match selection {
        AppSelection::Apps => config.steam.apps.clone(),
        AppSelection::Demos => config.steam.demos.clone(),
    };

    let output_dir = match config.configured_output_dir() {
        Some(dir) => dir.to_string(),
        None => arg
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(UploadError::MissingOutputDir)?
            .to_string(),
    };

    let user = non_empty_trimmed(steam_user).ok_or(UploadError::MissingUser)?;
    let builder = non_empty_trimmed(steam_builder).ok_or(UploadError::MissingBuilder)?;

    let uploader_name = uploader_executable_name(&builder);
    let builder_dir = PathBuf::from(builder);
    let uploader = builder_dir.join(uploader_name);

    Ok(UploadContext {
        selection,
        builds,
        output_dir,
        builder_dir,
        uploader,
        user,
    })
}

/// Pick the uploader executable by builder-directory suffix.
///
/// The SDK ships the Windows tool in a directory literally named `builder`
/// and the shell wrapper in `builder_linux`/`builder_osx`, so a plain
/// suffix check on the path string is enough. This is not a platform
/// probe; a Linux host pointing at a `builder` directory gets
/// `SteamCmd.exe`.
fn uploader_executable_name(builder_dir: &str) -> &'static str {
    if builder_dir.ends_with("builder") {
        WINDOWS_UPLOADER
    } else {
        UNIX_UPLOADER
    }
}

/// Return the trimmed value if non-empty after trimming, otherwise `None`.
fn non_empty_trimmed(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}
