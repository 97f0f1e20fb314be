//! Tests for `secretctl pull`.

#![cfg(unix)]

use crate::support::*;

#[test]
fn test_pull_decrypts_into_workspace() {
    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write(".secret.yml", &gpg_config(&gpg));
    t.write("secrets/app.json.gpg", "ENC:{\"db\":\"postgres://\"}");

    let output = t.pull();
    assert_success(&output);
    assert_reported(&output, "[File] Pulled: config/app.json");
    assert_eq!(t.read("config/app.json"), "{\"db\":\"postgres://\"}");

    let log = t.gpg_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("--pinentry-mode loopback"));
    assert!(log[0].starts_with("--batch"));
    assert!(log[0].ends_with("/secrets/app.json.gpg"));
}

#[test]
fn test_pulled_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write(".secret.yml", &gpg_config(&gpg));
    t.write("secrets/app.json.gpg", "ENC:{}");

    assert_success(&t.pull());

    let mode = std::fs::metadata(t.path("config/app.json"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_pull_missing_ciphertext_fails() {
    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write(".secret.yml", &gpg_config(&gpg));

    let output = t.pull();
    assert_error(&output, "config/app.json: file does not exist");
    assert!(t.gpg_log().is_empty());
}

#[test]
fn test_pull_surfaces_gpg_stderr() {
    let t = Test::new();
    let gpg = t.broken_gpg("gpg: decryption failed: No secret key");
    t.write(".secret.yml", &gpg_config(&gpg));
    t.write("secrets/app.json.gpg", "ENC:x");

    let output = t.pull();
    assert_error(&output, "gpg: decryption failed: No secret key");
    assert!(!t.exists("config/app.json"));
}

#[test]
fn test_pull_respects_base_path() {
    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write(
        "conf/.secret.yml",
        &format!(
            "base_path: ../workspace\n{}",
            gpg_config(&gpg)
        ),
    );
    t.write("workspace/secrets/app.json.gpg", "ENC:based");

    let output = t.run(&["--config", "conf/.secret.yml", "pull"]);
    assert_success(&output);
    assert_eq!(t.read("workspace/config/app.json"), "based");
}

#[test]
fn test_pull_config_from_env() {
    let t = Test::new();
    let gpg = t.fake_gpg();
    t.write("other.yml", &gpg_config(&gpg));
    t.write("secrets/app.json.gpg", "ENC:from-env");

    let output = t
        .cmd()
        .env("SECRETCTL_CONFIG", "other.yml")
        .arg("pull")
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(t.read("config/app.json"), "from-env");
}

#[cfg(not(target_os = "macos"))]
#[test]
fn test_pull_skips_keychain_off_macos() {
    let t = Test::with_config(
        r#"
files:
  id_rsa:
    keychain:
      label: ssh-key
"#,
    );

    let output = t.pull();
    assert_success(&output);
    assert_eq!(report_lines(&output), vec!["[File] Skipped: id_rsa (unsupported)"]);
    assert!(!t.exists("id_rsa"));
}

#[test]
fn test_pull_unconfigured_entry_fails() {
    let t = Test::with_config("files:\n  orphan.txt: {}\n");

    assert_error(&t.pull(), "orphan.txt: no storage parameter found");
}
