use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn call_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tetrad"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn scan_2_integer_limit() {
    let output = call_cli(&["scan", "--limit-type", "integer", "--limit", "2"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "1:1:1:1 |     0.000     0.000     0.000 | 0.000\n\
         1:1:1:2 |     0.000     0.000  1200.000 | 1.000\n\
         1:1:2:2 |     0.000  1200.000     0.000 | 1.000\n\
         1:2:2:2 |  1200.000     0.000     0.000 | 1.000\n"
    );
}

#[test]
fn scan_2_integer_limit_as_csv() {
    let output = call_cli(&[
        "scan",
        "--limit-type",
        "integer",
        "--limit",
        "2",
        "--format",
        "csv",
    ]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "chord,interval1_cents,interval2_cents,interval3_cents,complexity\n\
         1:1:1:1,0.000,0.000,0.000,0.000\n\
         1:1:1:2,0.000,0.000,1200.000,1.000\n\
         1:1:2:2,0.000,1200.000,0.000,1.000\n\
         1:2:2:2,1200.000,0.000,0.000,1.000\n"
    );
}

#[test]
fn scan_2_integer_limit_as_yaml() {
    let output = call_cli(&[
        "scan",
        "--limit-type",
        "integer",
        "--limit",
        "2",
        "--format",
        "yaml",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("chords:"));
    assert!(stdout.contains("1:1:1:2"));
    assert!(stdout.contains("complexity:"));
}

#[test]
fn scan_with_strict_filters_reports_an_empty_chord_space() {
    let output = call_cli(&[
        "scan",
        "--limit-type",
        "integer",
        "--limit",
        "1",
        "--hide-unisons",
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "");
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("No chords satisfy the given limits"));
}

#[test]
fn play_carries_the_pivot_frequency_across_chords() {
    let output = call_cli(&[
        "play",
        "--base-freq",
        "100",
        "--pivot",
        "soprano",
        "1:2:3:4",
        "3:4:5:6",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("== 1:2:3:4 (pivot: soprano)"));
    assert!(stdout.contains("100.000 Hz"));
    assert!(stdout.contains("400.000 Hz"));

    // The second chord is re-anchored s.t. its soprano stays at 400 Hz.
    assert!(stdout.contains("== 3:4:5:6 (pivot: soprano)"));
    assert!(stdout.contains("200.000 Hz"));
    assert!(stdout.contains("266.667 Hz"));
    assert!(stdout.contains("333.333 Hz"));
    assert_eq!(stdout.matches("400.000 Hz").count(), 2);
}

#[test]
fn play_rejects_a_malformed_chord() {
    let output = call_cli(&["play", "1:2:3"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Expected 4 chord members"));
}

#[test]
fn play_rejects_an_out_of_range_velocity() {
    let output = call_cli(&["play", "--velocity", "128", "4:5:6:7"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--velocity"));
    assert!(stderr.contains("128"));
}

#[test]
fn scan_rejects_an_unknown_complexity_measure() {
    let output = call_cli(&["scan", "--complexity", "euler"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown complexity measure"));
}
