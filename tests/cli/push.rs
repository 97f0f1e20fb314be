//! Tests for `secretctl push`.

#![cfg(unix)]

use crate::support::*;

#[test]
fn test_push_encrypts_file_and_env_var() {
    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write(".secret.yml", &gpg_config(&gpg));
    t.write("config/app.json", "{\"k\":1}");

    let output = t
        .cmd()
        .env("SECRETCTL_TEST_API_KEY", "sk-123")
        .arg("push")
        .output()
        .unwrap();
    assert_success(&output);
    assert_reported(&output, "[File] Pushed: config/app.json");
    assert_reported(&output, "[EnvVar] Pushed: SECRETCTL_TEST_API_KEY");

    assert_eq!(t.read("secrets/app.json.gpg"), "ENC:{\"k\":1}");
    assert_eq!(t.read("secrets/api_key.gpg"), "ENC:sk-123");

    for line in t.gpg_log() {
        assert_eq!(line, "-e -r alice@example.com");
    }
}

#[test]
fn test_push_ciphertext_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write(".secret.yml", &gpg_config(&gpg));
    t.write("config/app.json", "{}");

    let output = t
        .cmd()
        .env("SECRETCTL_TEST_API_KEY", "x")
        .arg("push")
        .output()
        .unwrap();
    assert_success(&output);

    let mode = std::fs::metadata(t.path("secrets/app.json.gpg"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_push_recipient_override() {
    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write(
        ".secret.yml",
        &format!(
            "storage:\n  gpg:\n    command: {}\nfiles:\n  a.txt:\n    gpg:\n      path: a.txt.gpg\n",
            gpg
        ),
    );
    t.write("a.txt", "plain");

    let output = t.run(&[
        "push",
        "--gpg-recipient",
        "bob@example.com",
        "--gpg-recipient",
        "carol@example.com",
    ]);
    assert_success(&output);
    assert_eq!(t.gpg_log(), vec!["-e -r bob@example.com -r carol@example.com"]);
}

#[test]
fn test_push_without_recipients_fails() {
    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write(
        ".secret.yml",
        &format!(
            "storage:\n  gpg:\n    command: {}\nfiles:\n  a.txt:\n    gpg:\n      path: a.txt.gpg\n",
            gpg
        ),
    );
    t.write("a.txt", "plain");

    let output = t.push();
    assert_error(&output, "a.txt: no recipients for encrypted file");
    assert!(t.gpg_log().is_empty());
    assert!(!t.exists("a.txt.gpg"));
}

#[test]
fn test_push_skips_pull_only_without_local_copy() {
    let t = Test::with_config(
        r#"
storage:
  vault:
    addr: http://127.0.0.1:9
files:
  db_password:
    pull_only: true
    vault:
      path: secret/db
env_vars:
  SECRETCTL_TEST_READONLY:
    pull_only: true
    vault:
      path: secret/ro
"#,
    );

    let output = t.push();
    assert_success(&output);
    assert_reported(&output, "[File] Skipped: db_password (pull only)");
    assert_reported(&output, "[EnvVar] Skipped: SECRETCTL_TEST_READONLY (pull only)");
}

#[cfg(not(target_os = "macos"))]
#[test]
fn test_push_skips_keychain_off_macos_without_local_copy() {
    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write(
        ".secret.yml",
        &format!(
            r#"
storage:
  gpg:
    command: {}
    recipients: [alice@example.com]
files:
  a.txt:
    gpg:
      path: a.txt.gpg
  id_rsa:
    keychain:
      label: ssh-key
env_vars:
  SECRETCTL_TEST_KEYCHAIN_ONLY:
    keychain:
      label: api-key
"#,
            gpg
        ),
    );
    t.write("a.txt", "plain");

    let output = t.push();
    assert_success(&output);
    assert_eq!(
        report_lines(&output),
        vec![
            "[File] Pushed: a.txt",
            "[File] Skipped: id_rsa (unsupported)",
            "[EnvVar] Skipped: SECRETCTL_TEST_KEYCHAIN_ONLY (unsupported)",
        ]
    );
    assert!(!t.exists("id_rsa"));
    assert_eq!(t.read("a.txt.gpg"), "ENC:plain");
}

#[test]
fn test_push_unset_env_var_fails() {
    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write(
        ".secret.yml",
        &format!(
            "storage:\n  gpg:\n    command: {}\n    recipients: [alice@example.com]\nenv_vars:\n  SECRETCTL_TEST_SURELY_UNSET:\n    gpg:\n      path: unset.gpg\n",
            gpg
        ),
    );

    assert_error(
        &t.push(),
        "environment variable does not exist: SECRETCTL_TEST_SURELY_UNSET",
    );
}
