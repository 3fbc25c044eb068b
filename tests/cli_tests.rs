#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("RESOURCE_SCHEDULE_WEEK_START")
        .env_remove("RESOURCE_SCHEDULE_AVAILABLE_HOURS")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_reports_double_booked_employee() {
    run_cli(
        "add employee R1 P1 2025-06-01 2025-06-05 8\n\
         add employee R1 P2 2025-06-04 2025-06-06 8\n\
         conflicts\nreport\nquit\n",
    )
    .success()
    .stdout(str_contains("Conflict employee:R1:"))
    .stdout(str_contains("from 2025-06-04 to 2025-06-05"))
    .stdout(str_contains(
        "Report (resources=1, conflicts=1, overbooked=employee:R1)",
    ));
}

#[test]
fn cli_rejects_inverted_dates() {
    run_cli("add employee R1 P1 2025-06-05 2025-06-01 8\nlist\nquit\n")
        .success()
        .stdout(str_contains("Error:"))
        .stdout(str_contains("before it starts"));
}

#[test]
fn cli_navigates_weeks() {
    run_cli("week 2025-06-04\nnext\nprev\nprev\nquit\n")
        .success()
        .stdout(str_contains("Week 2025-06-01 .. 2025-06-07"))
        .stdout(str_contains("Week 2025-06-08 .. 2025-06-14"))
        .stdout(str_contains("Week 2025-05-25 .. 2025-05-31"));
}

#[test]
fn cli_status_of_unknown_allocation_is_reported() {
    run_cli("status missing-id cancelled\nstatus missing-id paused\nquit\n")
        .success()
        .stdout(str_contains("allocation missing-id not found"))
        .stdout(str_contains("unknown allocation status 'paused'"));
}

#[test]
fn cli_shows_configuration() {
    run_cli("config show\nquit\n")
        .success()
        .stdout(str_contains("Available hours    : 160"))
        .stdout(str_contains("Week start         : Sun"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "add employee KEEP P1 2025-06-01 2025-06-05 8\nsave json {}\n\
         add equipment TEMP P1 2025-06-01 2025-06-05 2\nload json {}\nlist\nquit\n",
        path, path
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Loaded 1 allocations from"));
    let after_reload = output.split("Loaded 1 allocations from").last().unwrap_or_default();
    assert!(after_reload.contains("KEEP"));
    assert!(
        !after_reload.contains("TEMP"),
        "temporary allocation should not appear after reload:\n{}",
        after_reload
    );
}
