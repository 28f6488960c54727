use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::process;

use upload_steam::config::{self, BuildConfig};
use upload_steam::steamcmd::{self, ProcessRunner};
use upload_steam::{output, resolve};

/// Upload packaged game builds to Steam.
///
/// Reads `../Config/Build.json` for the configured app-build scripts, logs
/// in with the STEAM_USER account, and runs the Steam SDK uploader from the
/// STEAM_BUILDER directory once per configured entry, in order, stopping at
/// the first failure.
#[derive(Parser, Debug)]
#[command(
    name = "upload-steam",
    version,
    about,
    after_help = "Environment:\n  STEAM_USER     Steam username for the uploader login\n  STEAM_BUILDER  Steam SDK builder directory containing the uploader\n\nExamples:\n  upload-steam\n  upload-steam demo\n  upload-steam D:/Releases/Packaged\n  upload-steam --dry-run"
)]
struct Cli {
    /// `demo` to upload the demo entries; any other value overrides the
    /// output directory when Build.json leaves it unset.
    target: Option<String>,

    /// Print the uploader invocations without running them.
    #[arg(long)]
    dry_run: bool,

    /// Print resolved settings and full command lines.
    #[arg(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();
    output::set_verbose(cli.verbose);

    if let Err(e) = run(&cli) {
        output::fail("Failed", &format!("{e:#}"));
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config_dir = Path::new(config::CONFIG_DIR);
    let config = BuildConfig::load(config_dir)?;
    let ctx = resolve::resolve(&config, cli.target.as_deref())?;

    if output::is_verbose() {
        output::detail(&format!("user: {}", ctx.user));
        output::detail(&format!("builder: {}", ctx.builder_dir.display()));
        output::detail(&format!("uploader: {}", ctx.uploader.display()));
        output::detail(&format!("output dir: {}", ctx.output_dir));
    }

    let invocations = steamcmd::build_invocations(&ctx, config_dir);
    if invocations.is_empty() {
        output::note(&format!(
            "no {} entries configured, nothing to upload",
            ctx.selection.as_str()
        ));
        return Ok(());
    }

    if cli.dry_run {
        for invocation in &invocations {
            println!("{}", invocation.command_line());
        }
        output::note(&format!(
            "dry run: {} upload(s) planned, nothing spawned",
            invocations.len()
        ));
        return Ok(());
    }

    steamcmd::run_uploads(&invocations, &mut ProcessRunner)?;
    output::success("Done", &format!("{} upload(s) completed", invocations.len()));
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_bare_invocation() {
        let cli = Cli::parse_from(["upload-steam"]);
        assert_eq!(cli.target, None);
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parses_demo_target() {
        let cli = Cli::parse_from(["upload-steam", "demo"]);
        assert_eq!(cli.target.as_deref(), Some("demo"));
    }

    #[test]
    fn cli_parses_output_dir_target() {
        let cli = Cli::parse_from(["upload-steam", "D:/Releases/Packaged"]);
        assert_eq!(cli.target.as_deref(), Some("D:/Releases/Packaged"));
    }

    #[test]
    fn cli_parses_dry_run_flag() {
        let cli = Cli::parse_from(["upload-steam", "--dry-run"]);
        assert!(cli.dry_run);
        assert_eq!(cli.target, None);
    }

    #[test]
    fn cli_parses_verbose_with_target() {
        let cli = Cli::parse_from(["upload-steam", "-v", "demo"]);
        assert!(cli.verbose);
        assert_eq!(cli.target.as_deref(), Some("demo"));
    }

    #[test]
    fn cli_rejects_two_positional_arguments() {
        // The single argument is overloaded (demo switch or output-dir
        // override); a second positional has no meaning.
        assert!(Cli::try_parse_from(["upload-steam", "demo", "/out"]).is_err());
    }
}
