// Piped stdin selects bare mode, so these drive the REPL without a terminal.
mod common;

use common::cargo_bin;
use predicates::prelude::*;
use std::time::Duration;

#[test]
fn repl_empty_input_exits_cleanly() {
    cargo_bin()
        .arg("--repl")
        .write_stdin("")
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn repl_keeps_tape_between_lines() {
    cargo_bin()
        .arg("--repl")
        .write_stdin("+++\n.\n")
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{3}\n"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn repl_renders_tape_window_with_caret() {
    cargo_bin()
        .arg("--repl")
        .write_stdin(">>+\n")
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("     0     1     2     3")
                .and(predicate::str::contains("     0     0     1     0"))
                .and(predicate::str::contains(&format!("{}^\n", " ".repeat(17)))),
        );
}

#[test]
fn repl_reports_parse_error_and_continues() {
    cargo_bin()
        .arg("--repl")
        .write_stdin("++\n]\n.\n")
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .stderr(predicate::str::contains("Parse error: unmatched bracket ']'"))
        .stdout(predicate::str::contains("\u{2}\n"));
}

#[test]
fn repl_reset_clears_tape() {
    cargo_bin()
        .arg("--repl")
        .write_stdin("+++++\n:reset\n+.\n")
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1}\n").and(predicate::str::contains("\u{6}").not()));
}

#[test]
fn repl_quit_stops_reading() {
    cargo_bin()
        .arg("--repl")
        .write_stdin("+.\n:q\n++.\n")
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1}\n").and(predicate::str::contains("\u{3}").not()));
}

#[test]
fn repl_help_goes_to_stderr() {
    cargo_bin()
        .arg("--repl")
        .write_stdin(":help\n")
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(":reset"));
}

#[test]
fn repl_step_limit_applies_per_line() {
    cargo_bin()
        .arg("--repl")
        .arg("--max-steps").arg("50")
        .write_stdin("+[]\n+.\n")
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .stderr(predicate::str::contains("step limit exceeded (50)"))
        .stdout(predicate::str::contains("\u{1}\n"));
}

#[test]
fn repl_editor_requires_a_terminal() {
    cargo_bin()
        .arg("--repl")
        .arg("--editor")
        .write_stdin("+\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("stdin is not a TTY"));
}

#[test]
fn repl_mode_from_env_is_validated() {
    cargo_bin()
        .env("BFI_REPL_MODE", "tui")
        .arg("--repl")
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid BFI_REPL_MODE value: tui"));
}

#[test]
fn repl_flag_conflicts_with_a_path() {
    cargo_bin()
        .arg("--repl")
        .arg("prog.bf")
        .assert()
        .failure();
}
