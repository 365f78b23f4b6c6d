//! End-to-end tests of the remuxer binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Test utilities
mod test_utils {
    use super::*;

    /// The binary with a clean environment so ambient settings do not leak in
    pub fn remuxer(dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("remuxer").unwrap();
        cmd.current_dir(dir)
            .env_remove("RUST_LOG")
            .env("HOME", dir)
            .env("XDG_CONFIG_HOME", dir.join("xdg"))
            .env("REMUXER_LOG", "info");
        for var in [
            "REMUXER_CONFIG",
            "REMUXER_AUDIO_LANGS",
            "REMUXER_SUB_LANGS",
            "REMUXER_OUTPUT_FOLDER",
            "REMUXER_EXTRA_SUBS",
            "REMUXER_SUBTITLE_DELAY",
            "REMUXER_NO_PROGRESS",
            "REMUXER_STOP_ON_ERROR",
            "REMUXER_DELETE_EXISTING",
            "REMUXER_DRY_RUN",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    pub fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

use test_utils::*;

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    remuxer(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mux").and(predicate::str::contains("inspect")));
}

#[test]
fn test_mux_requires_inputs() {
    let dir = TempDir::new().unwrap();
    remuxer(dir.path()).arg("mux").assert().failure();
}

#[test]
fn test_nonexistent_input_is_skipped() {
    let dir = TempDir::new().unwrap();
    remuxer(dir.path())
        .args(["mux", "--no-progress", "missing.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.mkv").and(predicate::str::contains("does not exist")))
        .stderr(predicate::str::contains("processed 0 of 0 files"));
}

#[test]
fn test_non_mkv_input_is_skipped() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "clip.mp4", "not a matroska file");
    remuxer(dir.path())
        .args(["mux", "clip.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an mkv file"));
}

#[test]
fn test_stop_on_error_aborts_on_skip() {
    let dir = TempDir::new().unwrap();
    remuxer(dir.path())
        .args(["mux", "--stop-on-error", "missing.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mux run aborted"));
}

#[test]
fn test_unreadable_container_fails_file() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "broken.mkv", "this is not matroska");
    remuxer(dir.path())
        .args(["mux", "--dry-run", "broken.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("processed 0 of 1 file"));
}

#[test]
fn test_output_folder_is_created() {
    let dir = TempDir::new().unwrap();
    remuxer(dir.path())
        .args(["mux", "--output-folder", "out", "missing.mkv"])
        .assert()
        .failure();
    assert!(dir.path().join("out").is_dir());
}

#[test]
fn test_output_folder_must_be_directory() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "out", "");
    write_file(dir.path(), "a.mkv", "");
    remuxer(dir.path())
        .args(["mux", "-o", "out", "a.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_subs_needs_single_input() {
    let dir = TempDir::new().unwrap();
    remuxer(dir.path())
        .args(["mux", "--subs", "a.ass", "a.mkv", "b.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--subs can only be used with a single input"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "bad.toml", "[remuxer]\nshow_progress = \"sometimes\"\n");
    remuxer(dir.path())
        .args(["--config", "bad.toml", "mux", "a.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    remuxer(dir.path())
        .args(["--config", "nowhere.toml", "mux", "a.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.toml"));
}

#[test]
fn test_discovered_config_is_used() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "remuxer-config.toml", "[remuxer]\noutput_folder = \"from-config\"\n");
    remuxer(dir.path())
        .args(["mux", "missing.mkv"])
        .assert()
        .failure();
    assert!(dir.path().join("from-config").is_dir());
}

#[test]
fn test_legacy_json_config() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "legacy.json",
        r#"{"options": {"output-folder": "legacy-out", "show-progress": false}}"#,
    );
    remuxer(dir.path())
        .args(["--config", "legacy.json", "mux", "missing.mkv"])
        .assert()
        .failure();
    assert!(dir.path().join("legacy-out").is_dir());
}

#[test]
fn test_json_log_format() {
    let dir = TempDir::new().unwrap();
    remuxer(dir.path())
        .args(["--log-format", "json", "mux", "missing.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"level\":\"WARN\""));
}

#[test]
fn test_inspect_missing_file() {
    let dir = TempDir::new().unwrap();
    remuxer(dir.path())
        .args(["inspect", "missing.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input file not found"));
}
