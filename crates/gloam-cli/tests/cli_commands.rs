//! Integration tests for the gloam CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gloam() -> Command {
    Command::cargo_bin("gloam").unwrap()
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_reports_the_builtin_story() {
    gloam()
        .arg("check")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Relay Six")
                .and(predicate::str::contains("operations"))
                .and(predicate::str::contains("beats")),
        );
}

#[test]
fn check_rejects_a_broken_story() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    // A beat referencing an undeclared node.
    fs::write(
        &path,
        r#"{
            "name": "Broken",
            "content": {
                "start": "foyer",
                "nodes": [
                    { "id": "foyer", "kind": "room", "content": "Dust.", "unlocked": true }
                ]
            },
            "beats": [
                { "id": "bad", "trigger": { "unlocked": "nothing" } }
            ]
        }"#,
    )
    .unwrap();

    gloam()
        .args(["check", "--story", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("undeclared node"));
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_writes_an_editable_template() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("story.json");

    gloam()
        .args(["init", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created story template"));

    assert!(path.exists());

    // The template round-trips through check.
    gloam()
        .args(["check", "--story", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Relay Six"));
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("story.json");
    fs::write(&path, "{}").unwrap();

    gloam()
        .args(["init", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ---------------------------------------------------------------------------
// replay
// ---------------------------------------------------------------------------

fn script(dir: &TempDir, lines: &str) -> std::path::PathBuf {
    let path = dir.path().join("script.txt");
    fs::write(&path, lines).unwrap();
    path
}

#[test]
fn replay_walks_the_relay() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "look\nopen duty log\ngo archive\nescape\n");

    gloam()
        .args(["replay", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[operations]")
                .and(predicate::str::contains("reads faster than I can"))
                .and(predicate::str::contains("[archive]"))
                .and(predicate::str::contains("-- session escaped --")),
        );
}

#[test]
fn replay_locked_artifact_refuses() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "go archive\nopen locker\n");

    gloam()
        .args(["replay", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("It's locked.")
                .and(predicate::str::contains("-- session abandoned")),
        );
}

#[test]
fn replay_ticks_escalate_the_presence() {
    let dir = TempDir::new().unwrap();
    // Enough idle ticks before one look to cross the Watching threshold
    // (grace 2 + watch_at 3 with the default tuning).
    let path = script(&dir, "look\nlook\n");

    gloam()
        .args([
            "replay",
            path.to_str().unwrap(),
            "--ticks-between",
            "6",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("blink in time with yours"));
}

#[test]
fn replay_export_writes_the_transcript_file() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "look\nexport\n");
    let out = dir.path().join("transcript.json");

    gloam()
        .args([
            "replay",
            path.to_str().unwrap(),
            "--export",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("single page"));

    let blob = fs::read_to_string(&out).unwrap();
    assert!(blob.contains("\"summary\""));
    assert!(blob.contains("\"turn\": 0"));
}

#[test]
fn replay_missing_script_fails_visibly() {
    gloam()
        .args(["replay", "no-such-file.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn unknown_commands_stay_in_fiction() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "dance wildly\nescape\n");

    gloam()
        .args(["replay", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("means nothing to this terminal"));
}
