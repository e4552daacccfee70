//! CLI surface smoke tests
//!
//! These only exercise argument parsing and help output; nothing here talks
//! to a backend.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("quizmate").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("join"))
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("quizmate").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizmate"));
}

#[test]
fn test_login_requires_email() {
    let mut cmd = Command::cargo_bin("quizmate").unwrap();
    cmd.arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--email"));
}

#[test]
fn test_play_rejects_topic_and_quiz_together() {
    let mut cmd = Command::cargo_bin("quizmate").unwrap();
    cmd.args(["play", "--topic", "a", "--quiz", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("quizmate").unwrap();
    cmd.arg("spectate").assert().failure();
}
