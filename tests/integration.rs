// Integration tests for the clientscore CLI.
//
// These tests use assert_cmd to invoke the binary and verify
// exit codes, stdout/stderr output, and config side effects.
// HOME points at a scratch directory so a developer's global
// config never leaks into a run.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Command for the clientscore binary with an isolated HOME.
fn clientscore(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clientscore").expect("binary should exist");
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_version_flag() {
    let home = TempDir::new().expect("home dir should be created");
    clientscore(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clientscore"));
}

#[test]
fn cli_help_flag() {
    let home = TempDir::new().expect("home dir should be created");
    clientscore(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score freelance clients"));
}

#[test]
fn score_requires_path() {
    let home = TempDir::new().expect("home dir should be created");
    clientscore(&home)
        .arg("score")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn fetch_requires_url() {
    let home = TempDir::new().expect("home dir should be created");
    clientscore(&home)
        .arg("fetch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn score_job_page_markdown() {
    let home = TempDir::new().expect("home dir should be created");
    clientscore(&home)
        .arg("score")
        .arg(fixture("job_page.html"))
        .arg("--config-dir")
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("# Client Score Report"))
        .stdout(predicate::str::contains("Score: 91 (Good)"))
        .stdout(predicate::str::contains("- last seen: yesterday"));
}

#[test]
fn score_job_page_json_with_text_backend() {
    let home = TempDir::new().expect("home dir should be created");
    let output = clientscore(&home)
        .arg("score")
        .arg(fixture("job_page.html"))
        .args(["--backend", "text", "--format", "json"])
        .arg("--config-dir")
        .arg(home.path())
        .output()
        .expect("command should run");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    let first = &parsed[0];
    assert_eq!(first["score"], 91);
    assert_eq!(first["tier"], "Good");
    assert_eq!(first["signals"]["hiring_rate"], 80);
    assert_eq!(first["signals"]["total_jobs"], 12);
    assert_eq!(first["degraded"], false);
}

#[test]
fn card_mode_applies_degraded_penalty() {
    let home = TempDir::new().expect("home dir should be created");
    clientscore(&home)
        .arg("score")
        .arg(fixture("search_card.html"))
        .args(["--mode", "card"])
        .arg("--config-dir")
        .arg(home.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Score: 25 (Poor)"))
        .stdout(predicate::str::contains(
            "Degraded: base score 45 minus penalty 20",
        ));
}

#[test]
fn score_walks_directory_for_html_files() {
    let home = TempDir::new().expect("home dir should be created");
    let pages = TempDir::new().expect("pages dir should be created");
    fs::create_dir_all(pages.path().join("nested")).expect("nested dir should create");
    fs::copy(fixture("job_page.html"), pages.path().join("a.html")).expect("copy should work");
    fs::copy(fixture("search_card.html"), pages.path().join("nested/b.HTM"))
        .expect("copy should work");
    fs::write(pages.path().join("notes.txt"), "80% hire rate").expect("notes should write");

    let output = clientscore(&home)
        .arg("score")
        .arg(pages.path())
        .arg("--config-dir")
        .arg(home.path())
        .output()
        .expect("command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Score: ").count(), 2);
    assert!(stdout.contains("Score: 91 (Good)"));
    assert!(!stdout.contains("notes.txt"));
}

#[test]
fn score_reads_stdin() {
    let home = TempDir::new().expect("home dir should be created");
    let markup = fs::read_to_string(fixture("job_page.html")).expect("fixture should read");
    clientscore(&home)
        .args(["score", "-", "--config-dir"])
        .arg(home.path())
        .write_stdin(markup)
        .assert()
        .success()
        .stdout(predicate::str::contains("## <stdin>"))
        .stdout(predicate::str::contains("Score: 91 (Good)"));
}

#[test]
fn missing_path_is_runtime_failure() {
    let home = TempDir::new().expect("home dir should be created");
    clientscore(&home)
        .args(["score", "/definitely/not/here.html", "--config-dir"])
        .arg(home.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn invalid_weights_exit_with_config_code() {
    let home = TempDir::new().expect("home dir should be created");
    let project = TempDir::new().expect("project dir should be created");
    fs::write(
        project.path().join("clientscore.toml"),
        "[weights]\nhiring_rate = 90.0\n",
    )
    .expect("config should write");

    clientscore(&home)
        .args(["config", "validate", "--config-dir"])
        .arg(project.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("weights must sum to 100"));

    clientscore(&home)
        .arg("score")
        .arg(fixture("job_page.html"))
        .arg("--config-dir")
        .arg(project.path())
        .assert()
        .code(2);
}

#[test]
fn global_config_is_layered_under_project() {
    let home = TempDir::new().expect("home dir should be created");
    fs::create_dir_all(home.path().join(".config/clientscore")).expect("global dir should create");
    fs::write(
        home.path().join(".config/clientscore/config.toml"),
        "[thresholds]\ngood = 95\n",
    )
    .expect("global config should write");

    clientscore(&home)
        .arg("score")
        .arg(fixture("job_page.html"))
        .arg("--config-dir")
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 91 (Average)"));
}

#[test]
fn disabled_scoring_prints_notice() {
    let home = TempDir::new().expect("home dir should be created");
    let project = TempDir::new().expect("project dir should be created");

    clientscore(&home)
        .args(["config", "disable", "--config-dir"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("scoring disabled"));

    clientscore(&home)
        .arg("score")
        .arg(fixture("job_page.html"))
        .arg("--config-dir")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("scoring is disabled"))
        .stdout(predicate::str::contains("Score:").not());

    clientscore(&home)
        .args(["config", "enable", "--config-dir"])
        .arg(project.path())
        .assert()
        .success();

    clientscore(&home)
        .arg("score")
        .arg(fixture("job_page.html"))
        .arg("--config-dir")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 91 (Good)"));
}

#[test]
fn config_reset_writes_defaults() {
    let home = TempDir::new().expect("home dir should be created");
    let project = TempDir::new().expect("project dir should be created");
    fs::write(
        project.path().join("clientscore.toml"),
        "enabled = false\n[thresholds]\ngood = 90\n",
    )
    .expect("config should write");

    clientscore(&home)
        .args(["config", "reset", "--config-dir"])
        .arg(project.path())
        .assert()
        .success();

    clientscore(&home)
        .args(["config", "show", "--config-dir"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled = true"))
        .stdout(predicate::str::contains("good = 75"))
        .stdout(predicate::str::contains("[weights]"));
}

#[test]
fn unreachable_page_falls_back_to_card() {
    let home = TempDir::new().expect("home dir should be created");
    clientscore(&home)
        .args(["fetch", "http://127.0.0.1:9/jobs/~01", "--timeout", "5"])
        .arg("--fallback-card")
        .arg(fixture("search_card.html"))
        .arg("--config-dir")
        .arg(home.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("signals unavailable"))
        .stdout(predicate::str::contains("Score: 25 (Poor)"));
}
