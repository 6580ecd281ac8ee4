//! Integration tests for the `fieldlink` CLI binary.
//!
//! Argument parsing, help output, completions and error exit codes, all
//! without a live field controller.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

const ISOLATED_HOME: &str = "/tmp/fieldlink-cli-test-nonexistent";

/// Build a command for the `fieldlink` binary with env isolation.
///
/// Clears all `FIELDLINK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn fieldlink_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fieldlink");
    cmd.env("HOME", ISOLATED_HOME)
        .env("XDG_CONFIG_HOME", ISOLATED_HOME)
        .env_remove("FIELDLINK_PROFILE")
        .env_remove("FIELDLINK_HOST")
        .env_remove("FIELDLINK_PORT")
        .env_remove("FIELDLINK_SECURE")
        .env_remove("FIELDLINK_OUTPUT")
        .env_remove("FIELDLINK_TIMEOUT")
        .env_remove("FIELDLINK_DEFAULTS__TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = fieldlink_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    fieldlink_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("field hub controller")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("motor")),
    );
}

#[test]
fn test_version_flag() {
    fieldlink_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fieldlink"));
}

#[test]
fn test_match_help_lists_actions() {
    fieldlink_cmd().args(["match", "--help"]).assert().success().stdout(
        predicate::str::contains("start")
            .and(predicate::str::contains("pause"))
            .and(predicate::str::contains("resume"))
            .and(predicate::str::contains("stop")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    fieldlink_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    fieldlink_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_config_dir() {
    fieldlink_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_without_file_prints_defaults() {
    fieldlink_cmd()
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"default_profile\"")
                .and(predicate::str::contains("\"reconnect_delay_ms\"")),
        );
}

#[test]
fn test_config_use_unknown_profile() {
    let output = fieldlink_cmd()
        .args(["config", "use", "nope"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("nope"), "Expected profile name in:\n{text}");
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = fieldlink_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_motor_percent_out_of_range() {
    let output = fieldlink_cmd().args(["motor", "150"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("150"), "Expected rejected value in:\n{text}");
}

#[test]
fn test_force_rejects_unknown_mode() {
    let output = fieldlink_cmd().args(["force", "sideways"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_port_zero_is_rejected() {
    let output = fieldlink_cmd()
        .args(["status", "--port", "0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("port"), "Expected port validation in:\n{text}");
}

#[test]
fn test_unknown_profile_exit_code() {
    let output = fieldlink_cmd()
        .args(["--profile", "missing", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_reset_count_requires_yes_when_non_interactive() {
    let output = fieldlink_cmd()
        .args(["reset-count", "--host", "127.0.0.1", "--port", "9"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("--yes"), "Expected --yes hint in:\n{text}");
}

// ── No controller ───────────────────────────────────────────────────

#[test]
fn test_status_times_out_without_controller() {
    let output = fieldlink_cmd()
        .args(["status", "--host", "127.0.0.1", "--port", "9", "--timeout", "1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(8));
    let text = combined_output(&output);
    assert!(text.contains("Timed out"), "Expected timeout error in:\n{text}");
}

// ── Config file round trip ──────────────────────────────────────────

const SAMPLE_CONFIG: &str = r#"
default_profile = "practice"

[profiles.practice]
host = "10.0.0.2"

[profiles.venue]
host = "field.example.org"
secure = true
"#;

/// A `fieldlink` command whose config directory holds `SAMPLE_CONFIG`.
fn with_config(dir: &tempfile::TempDir) -> assert_cmd::Command {
    let config_dir = dir.path().join("fieldlink");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), SAMPLE_CONFIG).unwrap();

    let mut cmd = fieldlink_cmd();
    cmd.env("XDG_CONFIG_HOME", dir.path());
    cmd
}

#[test]
fn test_config_profiles_lists_names() {
    let dir = tempfile::tempdir().unwrap();
    with_config(&dir)
        .args(["config", "profiles", "-o", "plain"])
        .assert()
        .success()
        .stdout("practice\nvenue\n");
}

#[test]
fn test_config_profiles_table_shows_urls() {
    let dir = tempfile::tempdir().unwrap();
    with_config(&dir)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ws://10.0.0.2:5805")
                .and(predicate::str::contains("wss://field.example.org/ws")),
        );
}

#[test]
fn test_config_use_switches_default() {
    let dir = tempfile::tempdir().unwrap();
    with_config(&dir)
        .args(["config", "use", "venue"])
        .assert()
        .success();

    let written = std::fs::read_to_string(dir.path().join("fieldlink/config.toml")).unwrap();
    let parsed: toml::Value = toml::from_str(&written).unwrap();
    assert_eq!(parsed["default_profile"].as_str(), Some("venue"));
}
