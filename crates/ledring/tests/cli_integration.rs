//! Integration tests for the `ledring` binary.
//!
//! These tests exercise the CLI binary via `assert_cmd`. Nothing here talks
//! to the light service: remote subcommands are covered through `--help` or
//! through argument and color errors that are reported before any request.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cli() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ledring");
    cmd.env_remove("LEDRING_GROUP_ID").env_remove("RUST_LOG");
    cmd
}

/// Helper: a temp dir holding a config file with the given contents.
fn config_file(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ledring"));
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_config_json_produces_valid_json() {
    let (_dir, path) = config_file("group_leds = [1, 2, 3]\n");
    let output = cli()
        .args(["--json", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("config --json should produce valid JSON");
    assert_eq!(json["config_file_exists"], true);
    assert_eq!(json["settings"]["group_leds"], serde_json::json!([1, 2, 3]));
    assert_eq!(json["settings"]["api"]["set_method"], "PUT");
    assert!(json["problems"].as_array().unwrap().is_empty());
}

#[test]
fn cli_config_reports_group_override_source() {
    let (_dir, path) = config_file("");
    let output = cli()
        .args(["config", "--json", "--group-id", "cli-group-id", "--config"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["credential"]["source"], "config override");
    // Masked
    assert_eq!(json["credential"]["group_id"], "cli-…");
}

#[test]
fn cli_config_environment_source() {
    let (_dir, path) = config_file("secret_paths = []\n");
    cli()
        .env("LEDRING_GROUP_ID", "env-group")
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("environment (LEDRING_GROUP_ID)"));
}

#[test]
fn cli_config_lists_problems() {
    let (_dir, path) = config_file("group_leds = []\n[api]\ntimeout_secs = 0\n");
    cli()
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Problems:"))
        .stdout(predicate::str::contains("group_leds cannot be empty"));
}

// ── --verbose flag ──

#[test]
fn cli_verbose_flag_accepted() {
    let (_dir, path) = config_file("");
    cli().args(["-v", "config", "--config"]).arg(&path).assert().success();
}

#[test]
fn cli_verbose_long_flag_accepted() {
    let (_dir, path) = config_file("");
    cli()
        .args(["--verbose", "--verbose", "config", "--config"])
        .arg(&path)
        .assert()
        .success();
}

// ── Errors reported before any request ──

#[test]
fn cli_set_rejects_bad_color() {
    cli()
        .args(["set", "20", "#fff"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Color error"));
}

#[test]
fn cli_spin_rejects_bad_color() {
    cli()
        .args(["spin", "--color", "chartreuse"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Color error"));
}

#[test]
fn cli_invalid_config_is_refused() {
    let (_dir, path) = config_file("[api]\nbase_url = \"ftp://example.com/\"\n");
    cli()
        .args(["off", "--config"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("api.base_url"));
}

#[test]
fn cli_clock_rejects_bad_time() {
    cli()
        .args(["clock", "--time", "25:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hours"));
}

#[test]
fn cli_clock_time_conflicts_with_watch() {
    cli()
        .args(["clock", "--time", "03:00", "--watch"])
        .assert()
        .failure();
}

#[test]
fn cli_set_requires_color() {
    cli().args(["set", "20"]).assert().failure();
}

// ── Subcommand help ──

#[test]
fn cli_spin_help_succeeds() {
    cli()
        .args(["spin", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--turns"))
        .stdout(predicate::str::contains("--delay-ms"));
}

#[test]
fn cli_wheel_help_succeeds() {
    cli()
        .args(["wheel", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--steps"));
}

#[test]
fn cli_clock_help_succeeds() {
    cli()
        .args(["clock", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--watch"));
}

#[test]
fn cli_lists_all_subcommands() {
    let assert = cli().arg("--help").assert().success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for sub in [
        "lights", "light", "set", "delete", "off", "spin", "wheel", "clock", "demo", "config",
    ] {
        assert!(out.contains(sub), "missing subcommand {sub}");
    }
}
