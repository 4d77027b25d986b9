//! Integration tests for the `agenda` CLI binary.
//!
//! These run the real binary through `assert_cmd`, covering stdin and file
//! input, settings files, environment overrides and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn records_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/records.json")
}

fn settings_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/settings.toml")
}

fn agenda() -> Command {
    Command::cargo_bin("agenda").unwrap()
}

fn build_json(args: &[&str]) -> Vec<Value> {
    let output = agenda().args(args).output().unwrap();
    assert!(output.status.success(), "agenda {args:?} failed");
    serde_json::from_slice(&output.stdout).expect("stdout must be a JSON array")
}

// ─────────────────────────────────────────────────────────────────────────────
// build
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn build_file_to_stdout() {
    let entries = build_json(&["build", "-i", records_path(), "-s", settings_path()]);

    let positions: Vec<&str> = entries
        .iter()
        .map(|e| e["position"].as_str().unwrap())
        .collect();
    assert_eq!(
        positions,
        vec![
            "day-header",
            "start-of-today",
            "entry-date",
            "end-of-day",
            "day-header",
            "end-of-day",
            "day-header",
            "end-of-day",
            "list-footer"
        ]
    );
    assert_eq!(entries[8]["kind"], "footer");
    assert_eq!(entries[8]["footer"], "last");
}

#[test]
fn build_skips_invalid_rows() {
    agenda()
        .args(["build", "-i", records_path(), "-s", settings_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Broken").not());
}

#[test]
fn build_reads_bare_array_from_stdin() {
    let input = r#"[{"kind": "event", "id": "1", "title": "Standup", "start": "2026-10-18T10:00:00Z", "end": "2026-10-18T10:15:00Z"}]"#;
    let output = agenda()
        .args(["build", "--now", "2026-10-18T09:00:00Z"])
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());
    let entries: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1]["event"]["title"], "Standup");
}

#[test]
fn build_reports_provider_status() {
    let input = r#"{"records": [], "providerStatus": "noPermissions"}"#;
    let output = agenda()
        .args(["build", "--now", "2026-10-18T09:00:00Z"])
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());
    let entries: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["footer"], "noPermissions");
}

#[test]
fn build_writes_output_file() {
    let output_path = std::env::temp_dir().join("agenda-test-build-output.json");
    let _ = std::fs::remove_file(&output_path);

    agenda()
        .args(["build", "-i", records_path(), "-s", settings_path(), "--pretty", "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let entries: Vec<Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(entries.len(), 9);
    assert!(content.contains("\n  {"));

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn now_flag_overrides_settings_clock() {
    agenda()
        .args(["list", "-i", records_path(), "-s", settings_path()])
        .args(["--now", "2026-10-25T09:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("== Sun 25 Oct 2026 =="))
        .stdout(predicate::str::contains("Pay rent"))
        .stdout(predicate::str::contains("Call").not());
}

// ─────────────────────────────────────────────────────────────────────────────
// list
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn list_renders_plain_text() {
    let output = agenda()
        .args(["list", "-i", records_path(), "-s", settings_path()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "== Sun 18 Oct 2026 ==",
            "  [ ]         Pay rent (due 2026-10-17)",
            "  10:00-11:00 Call @ Room 4",
            "  all day     Trip",
            "== Mon 19 Oct 2026 ==",
            "  all day     Trip",
            "== Tue 20 Oct 2026 ==",
            "  all day     Trip",
            "(end)"
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// settings and environment
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn settings_shows_file_values() {
    agenda()
        .args(["settings", "-s", settings_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"allDayPlacement\": \"bottom\""))
        .stdout(predicate::str::contains("\"frozenAt\""));
}

#[test]
fn env_overrides_settings_file() {
    agenda()
        .args(["settings", "-s", settings_path()])
        .env("AGENDA_EVENT_RANGE_DAYS", "5")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"eventRangeDays\": 5"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn invalid_json_input_fails() {
    agenda()
        .args(["build", "--now", "2026-10-18T09:00:00Z"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input must be"));
}

#[test]
fn unknown_time_zone_fails() {
    agenda()
        .args(["build", "-i", records_path(), "-s", settings_path()])
        .env("AGENDA_TIME_ZONE", "Mars/Olympus_Mons")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to build agenda"));
}

#[test]
fn missing_input_file_fails() {
    agenda()
        .args(["build", "-i", "/nonexistent/records.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn invalid_now_is_rejected() {
    agenda()
        .args(["build", "--now", "yesterday-ish"])
        .write_stdin("[]")
        .assert()
        .failure();
}
