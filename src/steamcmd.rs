//! Uploader invocation helpers.
//!
//! Builds one `steamcmd` command line per configured build-description file
//! and runs them strictly in sequence. All process execution goes through
//! the [`UploadRunner`] trait so the sequencing logic can be exercised in
//! tests without spawning anything.
//!
//! The external tool is assumed stateful on the builder directory (login
//! session, depot cache), so an upload must finish before the next begins.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::UploadError;
use crate::output;
use crate::resolve::UploadContext;

/// One pending uploader run, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Full path to the uploader executable.
    pub uploader: PathBuf,
    /// The entry's relative path as written in `Build.json`, kept for
    /// progress and error messages.
    pub entry: String,
    /// Absolute path to the build-description file passed to
    /// `+run_app_build`.
    pub build_script: PathBuf,
    /// Steam username passed to `+login`.
    pub user: String,
    /// Working directory for the uploader process.
    pub builder_dir: PathBuf,
}

impl Invocation {
    /// The uploader argument vector: `+login <user> +run_app_build <script>
    /// +quit`.
    pub fn arguments(&self) -> Vec<OsString> {
        vec![
            OsString::from("+login"),
            OsString::from(&self.user),
            OsString::from("+run_app_build"),
            self.build_script.clone().into_os_string(),
            OsString::from("+quit"),
        ]
    }

    /// Render the full command line for dry-run and verbose output.
    pub fn command_line(&self) -> String {
        format!(
            "{} +login {} +run_app_build {} +quit",
            self.uploader.display(),
            self.user,
            self.build_script.display()
        )
    }
}

/// Build the ordered invocation list for a resolved context.
///
/// Each build-description path is the config directory joined with the
/// entry's relative path, made absolute so it stays valid once the uploader
/// runs with the builder directory as its cwd.
pub fn build_invocations(ctx: &UploadContext, config_dir: &Path) -> Vec<Invocation> {
    ctx.builds
        .iter()
        .map(|entry| {
            let joined = config_dir.join(entry);
            let build_script = std::path::absolute(&joined).unwrap_or(joined);
            Invocation {
                uploader: ctx.uploader.clone(),
                entry: entry.clone(),
                build_script,
                user: ctx.user.clone(),
                builder_dir: ctx.builder_dir.clone(),
            }
        })
        .collect()
}

/// Runs a single uploader invocation to completion.
///
/// `Ok(Some(code))` is the process exit code, `Ok(None)` means the process
/// died without one (killed by a signal). `Err` means the process could not
/// be launched at all.
pub trait UploadRunner {
    fn run(&mut self, invocation: &Invocation) -> std::io::Result<Option<i32>>;
}

/// Production runner: spawns the uploader and blocks until it exits.
pub struct ProcessRunner;

impl UploadRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> std::io::Result<Option<i32>> {
        let status = Command::new(&invocation.uploader)
            .args(invocation.arguments())
            .current_dir(&invocation.builder_dir)
            .status()?;
        Ok(status.code())
    }
}

/// Run every invocation in order, stopping at the first failure.
pub fn run_uploads(
    invocations: &[Invocation],
    runner: &mut dyn UploadRunner,
) -> Result<(), UploadError> {
    let total = invocations.len();
    for (i, invocation) in invocations.iter().enumerate() {
        let index = i + 1;
        output::action(
            "Uploading",
            &format!("{} ({index}/{total})", invocation.entry),
        );
        if output::is_verbose() {
            output::detail(&invocation.command_line());
        }

        let code = runner
            .run(invocation)
            .map_err(|source| UploadError::UploaderSpawn {
                command: invocation.uploader.clone(),
                source,
            })?;

        match code {
            Some(0) => output::success("Uploaded", &invocation.entry),
            other => {
                return Err(UploadError::UploadFailed {
                    index,
                    total,
                    build: invocation.entry.clone(),
                    status: match other {
                        Some(c) => format!("code {c}"),
                        None => "signal".to_string(),
                    },
                });
            }
        }
    }
    Ok(())
}
