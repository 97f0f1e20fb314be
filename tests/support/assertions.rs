//! Assertions over the output of a `secretctl` run.
//!
//! Report lines are compared whole: `[File] Pulled: a` does not match
//! `[File] Pulled: a.txt`.

use predicates::prelude::*;
use std::process::Output;

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Get stderr as String.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// The `[Kind] Outcome: name` lines printed by pull and push.
pub fn report_lines(output: &Output) -> Vec<String> {
    stdout(output)
        .lines()
        .filter(|line| line.starts_with('['))
        .map(str::to_string)
        .collect()
}

/// Assert the run exited 0.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "secretctl exited with {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        stdout(output),
        stderr(output)
    );
}

/// Assert the run exited 1 with a `✗` line containing `message`.
pub fn assert_error(output: &Output, message: &str) {
    assert_eq!(
        output.status.code(),
        Some(1),
        "expected exit code 1, stderr: {}",
        stderr(output)
    );
    let wanted = predicate::str::starts_with("✗ ").and(predicate::str::contains(message));
    let err = stderr(output);
    assert!(
        err.lines().any(|line| wanted.eval(line)),
        "no error line containing '{}', got: {}",
        message,
        err
    );
}

/// Assert a `→` hint containing `text` was printed.
pub fn assert_hint(output: &Output, text: &str) {
    let wanted = predicate::str::starts_with("→ ").and(predicate::str::contains(text));
    let out = stdout(output);
    assert!(
        out.lines().any(|line| wanted.eval(line)),
        "no hint containing '{}', got: {}",
        text,
        out
    );
}

/// Assert `line` is one of the report lines.
pub fn assert_reported(output: &Output, line: &str) {
    let lines = report_lines(output);
    assert!(
        predicate::in_iter(lines.clone()).eval(&line.to_string()),
        "report missing '{}', got: {:?}",
        line,
        lines
    );
}
