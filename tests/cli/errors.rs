//! Tests for error handling and CLI flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pull"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    t.cmd()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown-command"));
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("secretctl "));
}

#[test]
fn test_verbose_flag_accepted() {
    let t = Test::with_config("{}");

    let output = t.run(&["--verbose", "pull"]);
    assert_success(&output);
    assert!(report_lines(&output).is_empty());
}

#[test]
fn test_missing_config_fails_with_hint() {
    let t = Test::new();

    let output = t.pull();
    assert_error(&output, "unable to load configuration file");
    assert_hint(&output, "--config");
}

#[test]
fn test_malformed_config_fails() {
    let t = Test::with_config("files: [unclosed\n");

    assert_error(&t.pull(), "unable to parse configuration file");
}

#[test]
fn test_unknown_backend_key_fails() {
    let t = Test::with_config("files:\n  a.txt:\n    s3:\n      path: bucket/a\n");

    assert_error(&t.pull(), "unable to parse configuration file");
}

#[test]
fn test_ambiguous_selector_fails() {
    let t = Test::with_config(
        "files:\n  a.txt:\n    vault:\n      path: secret/a\n    gpg:\n      path: a.gpg\n",
    );

    assert_error(&t.pull(), "more than one storage backend");
}

#[test]
fn test_half_vault_identity_is_a_config_error() {
    let t = Test::with_config(
        "storage:\n  vault:\n    client_cert: certs/client.pem\nfiles:\n  a.txt:\n    vault:\n      path: secret/a\n",
    );

    let output = t.pull();
    assert_error(
        &output,
        "invalid storage.vault settings: unable to configure vault client: client_cert is set but client_key is missing",
    );
    assert_hint(&output, "VAULT_*");
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_secretctl"));
}

#[test]
fn test_completions_all_shells() {
    let t = Test::new();

    for shell in ["zsh", "fish", "power-shell"] {
        t.cmd()
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::is_empty().not());
    }
}

#[test]
fn test_completions_need_no_config() {
    let t = Test::new();
    assert!(!t.exists(".secret.yml"));

    t.cmd().args(["completions", "zsh"]).assert().success();
}
