//! Smoke tests for the failsnap CLI

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the failsnap binary, isolated from any ambient config
fn failsnap(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("failsnap").expect("failsnap binary should exist");
    cmd.current_dir(dir.path()).env_remove("FAILSNAP_CONFIG");
    cmd
}

fn write_manifest(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("tests.yaml");
    fs::write(
        &path,
        r"
suite: search
tests:
  - name: test_search
    node_id: tests/test_search.py::test_search
    doc: |
      Search: returns results.
      Only the first page is checked.
  - name: test_login
    node_id: tests/test_login.py::test_login[admin]
    doc: Login works for every role. Slow.
    params:
      role: admin
  - name: test_misc
",
    )
    .unwrap();
    path
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    failsnap(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    failsnap(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("capture"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    let dir = TempDir::new().unwrap();
    failsnap(&dir).assert().failure();
}

#[test]
fn test_list_subcommand_help() {
    let dir = TempDir::new().unwrap();
    failsnap(&dir)
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--collect-only"));
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_list_collect_only_prints_display_names() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir);

    failsnap(&dir)
        .arg("list")
        .arg(&manifest)
        .arg("--collect-only")
        .assert()
        .success()
        .stdout(predicate::eq(
            "Search returns results\nLogin works for every role Parameters role_\"admin\"\n",
        ));
}

#[test]
fn test_list_keeps_undocumented_ids() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir);

    failsnap(&dir)
        .arg("list")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("test_misc"))
        .stdout(predicate::str::contains("tests/test_search.py::test_search"));
}

#[test]
fn test_list_missing_manifest() {
    let dir = TempDir::new().unwrap();
    failsnap(&dir)
        .args(["list", "does-not-exist.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest error"));
}

#[test]
fn test_list_rejects_unnamed_test() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "tests:\n  - name: ''\n").unwrap();

    failsnap(&dir)
        .arg("list")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no name"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_prints_defaults() {
    let dir = TempDir::new().unwrap();
    failsnap(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("screenshot_dir: screenshots"))
        .stdout(predicate::str::contains("window_height: 1000"));
}

#[test]
fn test_config_discovers_local_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("failsnap.yaml"),
        "screenshot_dir: shots\nwindow_width: 800\n",
    )
    .unwrap();

    failsnap(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("screenshot_dir: shots"))
        .stdout(predicate::str::contains("window_width: 800"));
}

#[test]
fn test_config_rejects_zero_window() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.yaml");
    fs::write(&path, "window_width: 0\n").unwrap();

    failsnap(&dir)
        .arg("--config")
        .arg(&path)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

// ============================================================================
// Capture Tests
// ============================================================================

#[cfg(not(feature = "browser"))]
#[test]
fn test_capture_requires_browser_feature() {
    let dir = TempDir::new().unwrap();
    failsnap(&dir)
        .args(["capture", "http://localhost:8080"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Browser feature not enabled"));
}
