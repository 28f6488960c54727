//! Error types for the upload orchestrator.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing or running Steam uploads.
///
/// Every variant is fatal: the orchestrator reports the message and exits
/// non-zero. There is no retry layer above this.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("build configuration not found at {}", path.display())]
    ConfigNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse build configuration at {}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("output directory was neither set in Build.json nor passed on the command line")]
    MissingOutputDir,

    #[error("Steam user was not provided in the STEAM_USER environment variable")]
    MissingUser,

    #[error("Steam SDK builder directory was not provided in the STEAM_BUILDER environment variable")]
    MissingBuilder,

    #[error("failed to launch {}", command.display())]
    UploaderSpawn {
        command: PathBuf,
        source: std::io::Error,
    },

    #[error("upload {index} of {total} ({build}) failed: uploader exited with {status}")]
    UploadFailed {
        /// 1-based position of the failed entry in the selected collection.
        index: usize,
        total: usize,
        /// Relative build-description path of the failed entry.
        build: String,
        /// Human-readable exit status ("code 7", or "signal" on Unix kills).
        status: String,
    },
}
