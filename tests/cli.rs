// Drives the compiled binary for the one-shot commands. Every test points
// PIGAME_HOME at its own temp dir so nothing touches the real config.

use assert_cmd::Command;
use std::process::Output;
use tempfile::{tempdir, TempDir};

fn pigame(home: &TempDir, args: &[&str]) -> Output {
    Command::cargo_bin("pigame")
        .unwrap()
        .env("PIGAME_HOME", home.path())
        .env_remove("PIGAME_LOG")
        .args(args)
        .write_stdin("")
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn matching_candidate() {
    let home = tempdir().unwrap();
    let out = pigame(&home, &["3.14159"]);

    assert!(out.status.success());
    assert!(stdout(&out).ends_with("Match\n"));
}

#[test]
fn verbose_mismatch() {
    let home = tempdir().unwrap();
    let out = pigame(&home, &["-v", "3.14158"]);

    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("π with 5 decimals:\t3.14159"));
    assert!(text.contains("Number of errors: 1"));
    assert!(text.contains("You can do better!"));
}

#[test]
fn show_pi_to_length() {
    let home = tempdir().unwrap();

    let out = pigame(&home, &["-p", "10"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "3.14159 26535\n");

    let out = pigame(&home, &["-p", "0"]);
    assert_eq!(stdout(&out), "3.14159 26535 897\n");

    let out = pigame(&home, &["-p", "-3"]);
    assert_eq!(stdout(&out), "3.14159 26535 897\n");

    let out = pigame(&home, &["-v", "-p", "3"]);
    assert_eq!(stdout(&out), "π with 3 decimals:\t3.141\n");
}

#[test]
fn length_and_candidate_together() {
    let home = tempdir().unwrap();
    let out = pigame(&home, &["-p", "5", "3.14159"]);

    assert!(out.status.success());
    assert_eq!(stdout(&out), "3.14159\n3.14159\nMatch\n");
}

#[test]
fn length_too_large() {
    let home = tempdir().unwrap();
    let out = pigame(&home, &["-p", "5001"]);

    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("pigame error: Invalid input - too big a number for display"));
    assert!(err.contains("Usage:"));
}

#[test]
fn length_beyond_integer_range_is_too_large() {
    let home = tempdir().unwrap();
    let out = pigame(&home, &["-p", "99999999999999999999"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("too big a number for display (max 5000)"));
}

#[test]
fn candidate_longer_than_the_digit_table() {
    let home = tempdir().unwrap();
    let candidate = format!("3.{}", "1".repeat(5001));
    let out = pigame(&home, &["-v", &candidate]);

    assert!(out.status.success(), "{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.starts_with("π with 5000 decimals:"));
    assert!(text.ends_with("You can do better!\n"));
}

#[test]
fn length_not_an_integer() {
    let home = tempdir().unwrap();
    let out = pigame(&home, &["-p", "ten"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("NOT an integer"));
}

#[test]
fn candidate_not_a_number() {
    let home = tempdir().unwrap();

    for bad in ["abc", "3.", "3.14.15", "3,14"] {
        let out = pigame(&home, &[bad]);
        assert_eq!(out.status.code(), Some(1), "input {bad}");
        assert!(stderr(&out).contains("pigame error: Invalid input - NOT a float"));
    }
}

#[test]
fn no_arguments_prints_usage() {
    let home = tempdir().unwrap();
    let out = pigame(&home, &[]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("Usage:"));
}

#[test]
fn version_line() {
    let home = tempdir().unwrap();
    let out = pigame(&home, &["-V"]);

    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        format!(
            "pigame version: {} (https://github.com/docdyhr/pigame)\n",
            env!("CARGO_PKG_VERSION")
        )
    );
}

#[test]
fn easter_eggs() {
    let home = tempdir().unwrap();
    for egg in ["pi", "PI", "Archimedes"] {
        let out = pigame(&home, &[egg]);
        assert!(out.status.success());
        assert!(stdout(&out).contains("π = C / d"));
    }
}

#[test]
fn stats_on_fresh_home() {
    let home = tempdir().unwrap();
    let out = pigame(&home, &["--stats"]);

    assert!(out.status.success());
    assert!(stdout(&out).contains("No practice sessions yet"));
    assert!(home.path().join("stats.json").exists());
}

#[test]
fn practice_needs_a_terminal() {
    let home = tempdir().unwrap();

    for flag in ["--practice", "--config"] {
        let out = pigame(&home, &[flag]);
        assert_eq!(out.status.code(), Some(2));
        assert!(stderr(&out).contains("stdin must be a tty"));
    }
}

#[test]
fn unknown_practice_mode_is_a_usage_error() {
    let home = tempdir().unwrap();
    let out = pigame(&home, &["--practice", "--practice-mode", "blitz"]);

    assert_eq!(out.status.code(), Some(2));
}
