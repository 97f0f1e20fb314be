//! gpg passphrase cache and interactive prompt.
//!
//! The cache is filled at most once per process: either from configuration
//! or from the first interactive prompt. Clones share the same cell.

use serde::Deserialize;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{StorageError, StorageResult};

/// Write-once passphrase shared between the configuration and the gpg backend.
#[derive(Clone, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub struct PassphraseCache(Arc<OnceLock<Zeroizing<String>>>);

impl PassphraseCache {
    /// Cache already holding `passphrase`.
    pub fn preset(passphrase: impl Into<String>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Zeroizing::new(passphrase.into()));
        Self(Arc::new(cell))
    }

    pub fn get(&self) -> Option<&Zeroizing<String>> {
        self.0.get()
    }

    /// Cached passphrase, asking `prompt` only if nothing is cached yet.
    pub fn get_or_prompt(&self, prompt: &dyn PassphrasePrompt) -> StorageResult<&str> {
        if let Some(passphrase) = self.0.get() {
            return Ok(passphrase.as_str());
        }

        debug!("no cached passphrase, prompting");
        let passphrase = prompt.prompt()?;
        // A concurrent writer may have won.
        let _ = self.0.set(passphrase);
        self.0
            .get()
            .map(|p| p.as_str())
            .ok_or_else(|| StorageError::Prompt("passphrase cache is empty".to_string()))
    }
}

impl From<Option<String>> for PassphraseCache {
    fn from(value: Option<String>) -> Self {
        match value.filter(|p| !p.is_empty()) {
            Some(passphrase) => Self::preset(passphrase),
            None => Self::default(),
        }
    }
}

impl fmt::Debug for PassphraseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.0.get().is_some() {
            "<cached>"
        } else {
            "<empty>"
        };
        f.debug_tuple("PassphraseCache").field(&state).finish()
    }
}

/// Source of the passphrase when none is configured.
pub trait PassphrasePrompt {
    fn prompt(&self) -> StorageResult<Zeroizing<String>>;
}

/// Reads the passphrase from the terminal without echo.
pub struct TerminalPrompt;

impl PassphrasePrompt for TerminalPrompt {
    fn prompt(&self) -> StorageResult<Zeroizing<String>> {
        dialoguer::Password::new()
            .with_prompt("Please enter the passphrase to unlock the secret key")
            .allow_empty_password(true)
            .interact()
            .map(Zeroizing::new)
            .map_err(|e| StorageError::Prompt(e.to_string()))
    }
}
