//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a secretctl command isolated from the caller's environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test workspace
    /// - Vault and secretctl variables cleared, NO_COLOR set
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("secretctl").expect("failed to find secretctl binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        for var in [
            "VAULT_ADDR",
            "VAULT_TOKEN",
            "VAULT_CACERT",
            "VAULT_CAPATH",
            "VAULT_CLIENT_CERT",
            "VAULT_CLIENT_KEY",
            "VAULT_SKIP_VERIFY",
            "SECRETCTL_CONFIG",
            "SECRETCTL_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run secretctl with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run secretctl")
    }

    /// Shortcut for `secretctl pull`.
    pub fn pull(&self) -> Output {
        self.run(&["pull"])
    }

    /// Shortcut for `secretctl push`.
    pub fn push(&self) -> Output {
        self.run(&["push"])
    }

    /// Shortcut for `secretctl exec -- <command>`.
    pub fn exec(&self, command: &[&str]) -> Output {
        let mut args = vec!["exec", "--"];
        args.extend_from_slice(command);
        self.run(&args)
    }
}
