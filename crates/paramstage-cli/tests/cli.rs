//! Command-line behavior against a temporary settings database.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn paramstage(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("paramstage").unwrap();
    cmd.arg("--db")
        .arg(dir.path().join("settings.redb"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_set_then_show() {
    let dir = TempDir::new().unwrap();

    paramstage(&dir)
        .args(["set", "display.brightness=7", "network.api_key=hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 2 setting(s)"));

    paramstage(&dir)
        .args(["show", "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("display.brightness=7"))
        .stdout(predicate::str::contains("network.api_key=********"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_invalid_set_saves_nothing() {
    let dir = TempDir::new().unwrap();

    paramstage(&dir)
        .args(["set", "display.brightness=11", "display.theme=neon", "network.hostname=router"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("brightness: value (11) is out of range [0, 10]"))
        .stderr(predicate::str::contains("theme: neon is invalid, options are: [light, dark, system]"))
        .stderr(predicate::str::contains("2 setting(s) rejected"));

    paramstage(&dir)
        .args(["status", "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("network=missing"))
        .stdout(predicate::str::contains("display=missing"));
}

#[test]
fn test_set_json_reports_errors() {
    let dir = TempDir::new().unwrap();

    paramstage(&dir)
        .args(["--format", "json", "set", "network.mode=static"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"saved\": false"))
        .stdout(predicate::str::contains("static mode requires an address"));
}

#[test]
fn test_unknown_setting_and_malformed_assignment() {
    let dir = TempDir::new().unwrap();

    paramstage(&dir)
        .args(["set", "display.volume=3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown setting 'display.volume'"));

    paramstage(&dir)
        .args(["set", "brightness"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid assignment: brightness"));
}

#[test]
fn test_status_after_set() {
    let dir = TempDir::new().unwrap();

    paramstage(&dir)
        .args(["set", "schedule.start_date=2024-01-01", "schedule.end_date=2024-06-30"])
        .assert()
        .success();

    paramstage(&dir)
        .args(["status", "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("network=complete"))
        .stdout(predicate::str::contains("schedule=complete"));
}

#[test]
fn test_show_json() {
    let dir = TempDir::new().unwrap();

    paramstage(&dir)
        .args(["set", "display.night_mode=TRUE"])
        .assert()
        .success();

    let output = paramstage(&dir)
        .args(["show", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["display"]["night_mode"], "TRUE");
    assert_eq!(json["network"]["hostname"], "");
}

#[test]
fn test_reset() {
    let dir = TempDir::new().unwrap();

    paramstage(&dir)
        .args(["set", "display.brightness=2"])
        .assert()
        .success();

    paramstage(&dir)
        .args(["reset", "display"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset display to defaults"));

    paramstage(&dir)
        .args(["show", "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("display.brightness=\n"));

    paramstage(&dir)
        .args(["reset", "audio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category: audio"));

    paramstage(&dir).args(["reset", "--all"]).assert().success();
}

#[test]
fn test_edit_cancel() {
    let dir = TempDir::new().unwrap();

    paramstage(&dir)
        .arg("edit")
        .write_stdin("router\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing was saved"));

    paramstage(&dir)
        .args(["status", "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("network=missing"));
}

#[test]
fn test_edit_saves() {
    let dir = TempDir::new().unwrap();
    // hostname, then keep every other value
    let input = format!("router{}", "\n".repeat(12));

    paramstage(&dir)
        .arg("edit")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"));

    paramstage(&dir)
        .args(["show", "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("network.hostname=router"));
}

#[test]
fn test_path() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("settings.redb");

    paramstage(&dir)
        .args(["path", "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains(db.display().to_string()));
}

#[test]
fn test_db_from_environment() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("env.redb");

    Command::cargo_bin("paramstage")
        .unwrap()
        .env("PARAMSTAGE_DB", &db)
        .args(["set", "display.brightness=1"])
        .assert()
        .success();
    assert!(db.exists());
}
