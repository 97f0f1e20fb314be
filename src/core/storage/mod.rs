//! Secret storage backends and dispatch.
//!
//! [`Storage`] is the one place that decides which backend handles a
//! secret and whether the operation is allowed at all. File secrets and
//! environment-variable secrets both go through it, so pull-only and
//! unsupported-platform handling is identical for the two.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Backend` trait in a new file
//! 2. Add a `Selector` variant for it in `core::domain`
//! 3. Route the variant in `Storage::backend_for`

use std::path::PathBuf;
use tracing::debug;

use crate::core::config::Config;
use crate::core::domain::{SecretDescriptor, Selector};
use crate::core::path;
use crate::error::{ConfigError, Result, StorageError, StorageResult};

pub mod gpg;
pub mod keychain;
mod passphrase;
pub mod vault;

pub use gpg::Gpg;
pub use keychain::Keychain;
pub use passphrase::{PassphraseCache, PassphrasePrompt, TerminalPrompt};
pub use vault::Vault;

/// A storage backend addressed by a backend-specific locator.
pub trait Backend {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Whether the backend can run on this platform at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Fetch the secret at `locator`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` kind describing why the value is unavailable.
    fn read(&self, locator: &str) -> StorageResult<Vec<u8>>;

    /// Store `data` at `locator`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unsupported` when the backend can't run on
    /// this platform, or another kind when the write fails.
    fn write(&self, locator: &str, data: &[u8]) -> StorageResult<()>;
}

/// Routes each secret to its backend and applies the write policy.
pub struct Storage {
    base_path: PathBuf,
    vault: Box<dyn Backend>,
    keychain: Box<dyn Backend>,
    gpg: Box<dyn Backend>,
}

impl Storage {
    /// Build every backend from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Vault` if the Vault client can't be configured
    /// (unreadable or invalid TLS material).
    pub fn new(config: &Config) -> Result<Self> {
        let vault = Vault::new(&config.storage.vault).map_err(ConfigError::Vault)?;
        Ok(Self::with_backends(
            config.base_path.clone(),
            vault,
            Keychain::new(),
            Gpg::new(&config.storage.gpg),
        ))
    }

    /// Dispatcher over the given backends; relative gpg locators resolve
    /// against `base_path`.
    pub fn with_backends(
        base_path: PathBuf,
        vault: impl Backend + 'static,
        keychain: impl Backend + 'static,
        gpg: impl Backend + 'static,
    ) -> Self {
        Self {
            base_path,
            vault: Box::new(vault),
            keychain: Box::new(keychain),
            gpg: Box::new(gpg),
        }
    }

    /// Resolve the backend and the locator it should see.
    fn backend_for(&self, descriptor: &SecretDescriptor) -> StorageResult<(&dyn Backend, String)> {
        match descriptor.selector() {
            None => Err(StorageError::NoParameter),
            Some(Selector::Vault { path }) => Ok((self.vault.as_ref(), path.clone())),
            Some(Selector::Keychain { label }) => Ok((self.keychain.as_ref(), label.clone())),
            Some(Selector::Gpg { path }) => {
                let resolved = path::normalize(&self.base_path, path);
                Ok((self.gpg.as_ref(), resolved.to_string_lossy().into_owned()))
            }
        }
    }

    /// Backend and locator for a write, or the reason it must not happen.
    fn writable(&self, descriptor: &SecretDescriptor) -> StorageResult<(&dyn Backend, String)> {
        if descriptor.is_pull_only() {
            return Err(StorageError::PullOnly);
        }
        let (backend, locator) = self.backend_for(descriptor)?;
        if !backend.is_supported() {
            return Err(StorageError::Unsupported);
        }
        Ok((backend, locator))
    }

    /// Read the secret `name` from its backend.
    ///
    /// # Errors
    ///
    /// Returns `Error::Secret` naming the secret, with `NoParameter` when no
    /// backend is configured, `Unsupported` when the backend can't run on
    /// this platform, or the backend's own error kind otherwise.
    pub fn read(&self, name: &str, descriptor: &SecretDescriptor) -> Result<Vec<u8>> {
        let (backend, locator) = self
            .backend_for(descriptor)
            .map_err(|e| e.for_secret(name))?;
        if !backend.is_supported() {
            return Err(StorageError::Unsupported.for_secret(name));
        }

        debug!(secret = %name, backend = backend.name(), "reading secret");
        backend.read(&locator).map_err(|e| e.for_secret(name))
    }

    /// Check whether `name` could be written, without touching any backend.
    ///
    /// Lets callers skip an entry before they go looking for its local value.
    ///
    /// # Errors
    ///
    /// Returns the same `PullOnly`, `NoParameter` or `Unsupported` error
    /// that [`Storage::write`] would.
    pub fn check_write(&self, name: &str, descriptor: &SecretDescriptor) -> Result<()> {
        self.writable(descriptor)
            .map(|_| ())
            .map_err(|e| e.for_secret(name))
    }

    /// Write the secret `name` to its backend.
    ///
    /// # Errors
    ///
    /// Returns `Error::Secret` naming the secret, with `PullOnly` for
    /// pull-only descriptors (no backend is touched), `NoParameter` when no
    /// backend is configured, `Unsupported` when the backend can't run on
    /// this platform, or the backend's own error kind otherwise.
    pub fn write(&self, name: &str, descriptor: &SecretDescriptor, data: &[u8]) -> Result<()> {
        let (backend, locator) = self.writable(descriptor).map_err(|e| e.for_secret(name))?;

        debug!(secret = %name, backend = backend.name(), len = data.len(), "writing secret");
        backend.write(&locator, data).map_err(|e| e.for_secret(name))
    }
}
