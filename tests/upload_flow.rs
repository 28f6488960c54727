//! End-to-end upload flow tests against a fake uploader.
//!
//! These tests run the real `ProcessRunner` with a stand-in `steamcmd.sh`
//! that records its working directory and arguments, so the full
//! load-config → resolve → invoke pipeline is exercised without the Steam
//! SDK. Unix-only: the fake uploader is a shell script.

#![cfg(unix)]

use std::path::{Path, PathBuf};

use upload_steam::config::{BuildConfig, CONFIG_FILE_NAME};
use upload_steam::error::UploadError;
use upload_steam::resolve::resolve_with_env;
use upload_steam::steamcmd::{ProcessRunner, build_invocations, run_uploads};

/// Create a fake builder directory containing an executable `steamcmd.sh`
/// with the given body. Returns the canonicalized directory path.
fn fake_builder(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let builder = dir.join("builder_linux");
    std::fs::create_dir(&builder).unwrap();
    let script = builder.join("steamcmd.sh");
    std::fs::write(&script, body).unwrap();
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();
    builder.canonicalize().unwrap()
}

/// Create a config directory holding a `Build.json` with two app entries
/// and one demo entry. Returns the canonicalized directory path.
fn fake_config_dir(dir: &Path) -> PathBuf {
    let config_dir = dir.join("Config");
    std::fs::create_dir(&config_dir).unwrap();
    std::fs::write(
        config_dir.join(CONFIG_FILE_NAME),
        r#"{
            "outputDir": "Out",
            "steam": {
                "apps": ["SteamAppA.vdf", "SteamAppB.vdf"],
                "demos": ["SteamDemo.vdf"]
            }
        }"#,
    )
    .unwrap();
    config_dir.canonicalize().unwrap()
}

fn read_log(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn uploads_every_app_entry_in_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    let log = tmp.path().join("calls.log");
    let builder = fake_builder(
        tmp.path(),
        &format!("#!/bin/sh\necho \"$PWD|$*\" >> \"{}\"\nexit 0\n", log.display()),
    );
    let config_dir = fake_config_dir(tmp.path());

    let config = BuildConfig::load(&config_dir).unwrap();
    let ctx = resolve_with_env(
        &config,
        None,
        Some("tester".into()),
        Some(builder.to_string_lossy().into_owned()),
    )
    .unwrap();
    let invocations = build_invocations(&ctx, &config_dir);

    run_uploads(&invocations, &mut ProcessRunner).unwrap();

    let calls = read_log(&log);
    assert_eq!(calls.len(), 2);
    for (call, entry) in calls.iter().zip(["SteamAppA.vdf", "SteamAppB.vdf"]) {
        let expected = format!(
            "{}|+login tester +run_app_build {} +quit",
            builder.display(),
            config_dir.join(entry).display()
        );
        assert_eq!(call, &expected);
    }
}

#[test]
fn demo_mode_uploads_the_demo_entry() {
    let tmp = tempfile::TempDir::new().unwrap();
    let log = tmp.path().join("calls.log");
    let builder = fake_builder(
        tmp.path(),
        &format!("#!/bin/sh\necho \"$*\" >> \"{}\"\nexit 0\n", log.display()),
    );
    let config_dir = fake_config_dir(tmp.path());

    let config = BuildConfig::load(&config_dir).unwrap();
    let ctx = resolve_with_env(
        &config,
        Some("demo"),
        Some("tester".into()),
        Some(builder.to_string_lossy().into_owned()),
    )
    .unwrap();
    let invocations = build_invocations(&ctx, &config_dir);

    run_uploads(&invocations, &mut ProcessRunner).unwrap();

    let calls = read_log(&log);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("SteamDemo.vdf"), "got: {}", calls[0]);
}

#[test]
fn failing_upload_stops_the_sequence() {
    let tmp = tempfile::TempDir::new().unwrap();
    let log = tmp.path().join("calls.log");
    // Fail on the first entry: the second must never be attempted.
    let builder = fake_builder(
        tmp.path(),
        &format!(
            "#!/bin/sh\necho \"$*\" >> \"{}\"\ncase \"$*\" in *SteamAppA.vdf*) exit 3;; esac\nexit 0\n",
            log.display()
        ),
    );
    let config_dir = fake_config_dir(tmp.path());

    let config = BuildConfig::load(&config_dir).unwrap();
    let ctx = resolve_with_env(
        &config,
        None,
        Some("tester".into()),
        Some(builder.to_string_lossy().into_owned()),
    )
    .unwrap();
    let invocations = build_invocations(&ctx, &config_dir);

    let err = run_uploads(&invocations, &mut ProcessRunner).unwrap_err();

    assert_eq!(read_log(&log).len(), 1, "second upload must not run");
    match err {
        UploadError::UploadFailed {
            index,
            total,
            build,
            status,
        } => {
            assert_eq!(index, 1);
            assert_eq!(total, 2);
            assert_eq!(build, "SteamAppA.vdf");
            assert_eq!(status, "code 3");
        }
        other => panic!("expected UploadFailed, got {other:?}"),
    }
}

#[test]
fn missing_uploader_reports_spawn_failure() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config_dir = fake_config_dir(tmp.path());
    // Builder directory exists but contains no uploader executable.
    let builder = tmp.path().join("builder_linux");
    std::fs::create_dir(&builder).unwrap();

    let config = BuildConfig::load(&config_dir).unwrap();
    let ctx = resolve_with_env(
        &config,
        None,
        Some("tester".into()),
        Some(builder.to_string_lossy().into_owned()),
    )
    .unwrap();
    let invocations = build_invocations(&ctx, &config_dir);

    let err = run_uploads(&invocations, &mut ProcessRunner).unwrap_err();
    assert!(matches!(err, UploadError::UploaderSpawn { .. }));
}
