#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::{NamedTempFile, tempdir};

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("AGENDA_TOOL_SETTINGS")
        .env_remove("AGENDA_TOOL_OUTPUT_DIR")
        .write_stdin(script.to_string())
        .assert()
}

const WORKSHOP: &str = "title Rust Workshop\n\
dates 2024-03-01 2024-03-02\n\
slot add 09:00 11:00\n\
slot add 14:00 15:30\n\
break add 12:00 13:00 Lunch\n\
content 1 1 Ownership | moves; borrows | Ada\n\
content 1 2 Traits\n\
content 2 1 Lifetimes\n\
content 2 2 Async\n";

#[test]
fn cli_rejects_reversed_dates() {
    run_cli("dates 2025-01-10 2025-01-05\nquit\n")
        .success()
        .stdout(str_contains(
            "start date 2025-01-10 must be on or before end date 2025-01-05",
        ));
}

#[test]
fn cli_preview_prints_merged_table() {
    let script = format!("{WORKSHOP}preview\nquit\n");
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);

    assert!(output.contains("Rust Workshop"));
    assert!(output.contains("Day 1 (Fri, 01 Mar 2024)"));
    let ownership = output.find("Ownership").expect("morning session");
    let lunch = output.find("| Lunch").expect("lunch break");
    let traits = output.find("Traits").expect("afternoon session");
    assert!(ownership < lunch && lunch < traits);
    assert!(output.contains("• moves"));
    assert!(output.contains("Trainer: Ada"));
}

#[test]
fn cli_preview_reports_missing_content() {
    run_cli("dates 2024-03-01 2024-03-02\nslot add 09:00 10:00\ncontent 1 1 Only day one\npreview\nquit\n")
        .success()
        .stdout(str_contains("missing content for day 2, slot 1"));
}

#[test]
fn cli_lists_and_removes_breaks() {
    run_cli("break add 10:30 10:45 Coffee\nbreak add 12:00 13:00 Long lunch\nbreak remove 1\nbreak list\nquit\n")
        .success()
        .stdout(str_contains("Removed break 'Coffee'"))
        .stdout(str_contains("1. Long lunch 12:00 - 13:00"));
}

#[test]
fn cli_rejects_content_beyond_supported_days() {
    run_cli("slot add 09:00 10:00\ncontent 18446744073709551615 1 Far away\ncontent 1 5 No such slot\nshow\nquit\n")
        .success()
        .stdout(str_contains(
            "Error: day 18446744073709551615 is beyond the last supported day 30",
        ))
        .stdout(str_contains("Error: slot index 4 is out of range for 1 slots"))
        .stdout(str_contains("Title      : Untitled agenda"));
}

#[test]
fn cli_rejects_bad_clock_times() {
    run_cli("slot add 9am 10:00\nquit\n")
        .success()
        .stdout(str_contains("invalid time '9am'"));
}

#[test]
fn cli_exports_csv_to_path() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("agenda.csv");
    let script = format!("{WORKSHOP}export csv {}\nquit\n", target.display());

    run_cli(&script)
        .success()
        .stdout(str_contains("Exported"));

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.starts_with("start,end,kind,2024-03-01,2024-03-02"));
    assert!(written.contains("12:00,13:00,break,Lunch,Lunch"));
}

#[test]
#[allow(deprecated)]
fn cli_exports_to_configured_output_dir() {
    let dir = tempdir().unwrap();
    let script = format!("{WORKSHOP}export doc\nquit\n");

    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("AGENDA_TOOL_SETTINGS")
        .env("AGENDA_TOOL_OUTPUT_DIR", dir.path())
        .write_stdin(script)
        .assert()
        .success();

    let written = std::fs::read_to_string(dir.path().join("agenda.doc")).unwrap();
    assert!(written.contains("Rust Workshop"));
}

#[test]
fn cli_load_json_replaces_draft() {
    let tmp = NamedTempFile::new().expect("create temp file");
    std::fs::write(
        tmp.path(),
        r#"{
            "title": "Loaded Agenda",
            "start_date": "2024-06-03",
            "end_date": "2024-06-03",
            "slots": [{ "index": 0, "start": "10:00", "end": "11:00" }],
            "day_content": [[{ "title": "Loaded session" }]]
        }"#,
    )
    .unwrap();
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!("title Temp\nload json {path}\nshow\npreview\nquit\n");

    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let after_load = output.split("Loaded.").last().unwrap_or_default();
    assert!(after_load.contains("Loaded Agenda"));
    assert!(after_load.contains("Loaded session"));
    assert!(!after_load.contains("Temp"));
}

#[test]
fn cli_unknown_export_format_is_reported() {
    run_cli("export xlsx out.xlsx\nquit\n")
        .success()
        .stdout(str_contains("unknown format 'xlsx'"));
}
