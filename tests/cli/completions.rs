//! Tests for `ansibase completions` and top-level help.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_completions_bash() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_ansibase"));
}

#[test]
fn test_completions_need_no_config() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef ansibase"));
}

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("inventory")
                .and(predicate::str::contains("import"))
                .and(predicate::str::contains("lint")),
        );
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    t.cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
