//! GPG backend.
//!
//! Secrets live in gpg-encrypted files on the local filesystem. Encryption
//! and decryption run the `gpg` CLI; the plaintext never touches disk here.
//!
//! ## Requirements
//!
//! - `gpg` CLI must be installed (or `storage.gpg.command` set)
//! - Public keys for every recipient must be in the keyring
//! - The secret key must be available for decryption
//!
//! ## Usage
//!
//! ```yaml
//! storage:
//!   gpg:
//!     recipients:
//!       - alice@example.com
//!       - ABCD1234ABCD1234ABCD1234ABCD1234ABCD1234
//! files:
//!   config/credentials.json:
//!     gpg:
//!       path: secrets/credentials.json.gpg
//! ```

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, trace};

use super::passphrase::{PassphraseCache, PassphrasePrompt, TerminalPrompt};
use super::Backend;
use crate::core::config::GpgConfig;
use crate::core::constants;
use crate::core::local;
use crate::error::{StorageError, StorageResult};

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Runs an external command with piped stdin and captured stdout/stderr.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String], stdin: &[u8]) -> io::Result<CommandOutput>;
}

/// Spawns real child processes.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], stdin: &[u8]) -> io::Result<CommandOutput> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let pipe = child.stdin.take();
        // Feed stdin from a second thread so a large output can't stall the child.
        std::thread::scope(|scope| {
            let writer = scope.spawn(move || -> io::Result<()> {
                if let Some(mut pipe) = pipe {
                    pipe.write_all(stdin)?;
                }
                Ok(())
            });

            let output = child.wait_with_output()?;
            let written = writer.join().unwrap_or_else(|_| {
                Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked"))
            });
            if output.status.success() {
                written?;
            }

            Ok(CommandOutput {
                success: output.status.success(),
                stdout: output.stdout,
                stderr: output.stderr,
            })
        })
    }
}

/// gpg executable to run: the configured one, else `gpg` found on PATH.
pub fn resolve_command(configured: Option<&str>) -> String {
    if let Some(command) = configured.filter(|c| !c.is_empty()) {
        return command.to_string();
    }
    which::which(constants::GPG_COMMAND)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| constants::GPG_COMMAND.to_string())
}

/// Arguments for decrypting `path` with the passphrase on stdin.
pub fn decrypt_args(path: &str) -> Vec<String> {
    [
        "--batch",
        "--no-tty",
        "--passphrase-fd",
        "0",
        "--pinentry-mode",
        "loopback",
        "-d",
        path,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Arguments for encrypting stdin for every recipient.
pub fn encrypt_args(recipients: &[String]) -> Vec<String> {
    let mut args = vec!["-e".to_string()];
    for recipient in recipients {
        args.push("-r".to_string());
        args.push(recipient.clone());
    }
    args
}

/// GPG storage backend.
pub struct Gpg {
    command: String,
    recipients: Vec<String>,
    passphrase: PassphraseCache,
    prompt: Box<dyn PassphrasePrompt>,
    runner: Box<dyn CommandRunner>,
}

impl Gpg {
    /// Backend running the real gpg and prompting on the terminal.
    pub fn new(config: &GpgConfig) -> Self {
        Self::with_parts(
            resolve_command(config.command.as_deref()),
            config.recipients.clone(),
            config.passphrase.clone(),
            TerminalPrompt,
            SystemRunner,
        )
    }

    /// Backend with an explicit prompt and command runner.
    pub fn with_parts(
        command: impl Into<String>,
        recipients: Vec<String>,
        passphrase: PassphraseCache,
        prompt: impl PassphrasePrompt + 'static,
        runner: impl CommandRunner + 'static,
    ) -> Self {
        Self {
            command: command.into(),
            recipients,
            passphrase,
            prompt: Box::new(prompt),
            runner: Box::new(runner),
        }
    }

    fn run(&self, args: &[String], stdin: &[u8]) -> StorageResult<Vec<u8>> {
        trace!(command = %self.command, ?args, "running gpg");
        let output = self.runner.run(&self.command, args, stdin)?;
        if !output.success {
            return Err(StorageError::Command {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }
}

impl Backend for Gpg {
    fn name(&self) -> &'static str {
        "gpg"
    }

    fn read(&self, locator: &str) -> StorageResult<Vec<u8>> {
        let path = Path::new(locator);
        if !path.exists() {
            return Err(StorageError::FileNotFound(path.to_path_buf()));
        }

        let passphrase = self.passphrase.get_or_prompt(self.prompt.as_ref())?;
        debug!(path = %path.display(), "decrypting with gpg");

        let plaintext = self.run(&decrypt_args(locator), passphrase.as_bytes())?;
        trace!(len = plaintext.len(), "decrypted with gpg");
        Ok(plaintext)
    }

    fn write(&self, locator: &str, data: &[u8]) -> StorageResult<()> {
        if self.recipients.is_empty() {
            return Err(StorageError::NoRecipients);
        }

        let path = Path::new(locator);
        debug!(
            path = %path.display(),
            recipients = self.recipients.len(),
            "encrypting with gpg"
        );

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            local::create_private_dir(dir)?;
        }

        let ciphertext = self.run(&encrypt_args(&self.recipients), data)?;
        local::write_private(path, &ciphertext)?;

        trace!(len = ciphertext.len(), "encrypted with gpg");
        Ok(())
    }
}
