//! Test fixtures.

use super::Test;

/// Ciphertext marker written by the fake gpg.
pub const CIPHER_PREFIX: &str = "ENC:";

/// Passphrase passed on every command that decrypts.
pub const PASSPHRASE: &str = "correct horse";

impl Test {
    /// Install a fake gpg in the home dir and return its path.
    ///
    /// `-e` prefixes stdin with `ENC:`; anything else decrypts the last
    /// argument by stripping the prefix. Every invocation's arguments are
    /// appended to `gpg.log` in the home dir.
    #[cfg(unix)]
    pub fn fake_gpg(&self) -> String {
        let script = format!(
            r#"#!/bin/sh
echo "$@" >> '{log}'
case "$1" in
  -e) printf '{prefix}'; cat ;;
  *) cat > /dev/null; for last; do :; done; sed 's/^{prefix}//' "$last" ;;
esac
"#,
            log = self.home.path().join("gpg.log").display(),
            prefix = CIPHER_PREFIX,
        );
        self.install_script("gpg", &script)
    }

    /// Install a gpg that always fails with `message` on stderr.
    #[cfg(unix)]
    pub fn broken_gpg(&self, message: &str) -> String {
        let script = format!("#!/bin/sh\ncat > /dev/null\necho '{}' >&2\nexit 2\n", message);
        self.install_script("broken-gpg", &script)
    }

    /// Arguments of every fake gpg invocation, one line each.
    pub fn gpg_log(&self) -> Vec<String> {
        std::fs::read_to_string(self.home.path().join("gpg.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[cfg(unix)]
    fn install_script(&self, name: &str, script: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = self.home.path().join(name);
        std::fs::write(&path, script).expect("failed to write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("failed to chmod script");
        path.display().to_string()
    }
}

/// Mapping file with one gpg file secret and one gpg env var secret.
pub fn gpg_config(gpg: &str) -> String {
    format!(
        r#"
storage:
  gpg:
    command: {gpg}
    passphrase: "{PASSPHRASE}"
    recipients:
      - alice@example.com
files:
  config/app.json:
    gpg:
      path: secrets/app.json.gpg
env_vars:
  SECRETCTL_TEST_API_KEY:
    gpg:
      path: secrets/api_key.gpg
"#
    )
}
