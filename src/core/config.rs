//! Mapping file management.
//!
//! Reads `.secret.yml` (or a `.toml` mapping file) into an immutable
//! [`Config`]: storage backend settings plus one [`SecretDescriptor`] per
//! file and environment-variable secret.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::domain::{DescriptorEntry, SecretDescriptor};
use crate::core::path;
use crate::core::storage::PassphraseCache;
use crate::error::{ConfigError, Result};

/// Loaded mapping file.
#[derive(Debug)]
pub struct Config {
    /// Absolute directory every relative file and gpg locator resolves against.
    pub base_path: PathBuf,
    pub storage: StorageConfig,
    /// File secrets keyed by local path.
    pub files: BTreeMap<String, SecretDescriptor>,
    /// Environment-variable secrets keyed by variable name.
    pub env_vars: BTreeMap<String, SecretDescriptor>,
}

/// Backend settings shared by every secret.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub vault: VaultConfig,
    pub gpg: GpgConfig,
}

/// Remote key-value store settings.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub addr: Option<String>,
    pub token: Option<String>,
    pub ca_cert: Option<PathBuf>,
    pub ca_path: Option<PathBuf>,
    pub client_cert: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
    pub tls_skip_verify: bool,
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("addr", &self.addr)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("ca_cert", &self.ca_cert)
            .field("ca_path", &self.ca_path)
            .field("client_cert", &self.client_cert)
            .field("client_key", &self.client_key)
            .field("tls_skip_verify", &self.tls_skip_verify)
            .finish()
    }
}

/// gpg settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GpgConfig {
    /// Key ids or email addresses every encrypted file is written for.
    #[serde(alias = "recipents")]
    pub recipients: Vec<String>,
    /// Passphrase for the secret key. Prompted for on first decrypt when unset.
    pub passphrase: PassphraseCache,
    /// gpg executable. Defaults to `gpg` on PATH.
    pub command: Option<String>,
}

/// Mapping file format, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Format::Toml,
            _ => Format::Yaml,
        }
    }
}

/// Mapping file as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MappingFile {
    base_path: Option<PathBuf>,
    storage: Option<StorageConfig>,
    files: Option<BTreeMap<String, Option<DescriptorEntry>>>,
    env_vars: Option<BTreeMap<String, Option<DescriptorEntry>>>,
}

/// Command-line overrides for storage settings.
///
/// Empty values leave the mapping file's setting in place.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub vault_addr: Option<String>,
    pub vault_token: Option<String>,
    pub vault_ca_cert: Option<PathBuf>,
    pub vault_ca_path: Option<PathBuf>,
    pub vault_client_cert: Option<PathBuf>,
    pub vault_client_key: Option<PathBuf>,
    pub vault_tls_skip_verify: bool,
    pub gpg_recipients: Vec<String>,
    pub gpg_passphrase: Option<String>,
    pub gpg_command: Option<String>,
}

impl Config {
    /// Load and validate a mapping file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file cannot be read, a parse
    /// error if it is malformed, or `ConfigError::AmbiguousSelector` if an
    /// entry names more than one backend.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let cwd = std::env::current_dir()?;
        Self::parse(&contents, Format::from_path(path), path, &cwd)
    }

    /// Parse mapping file contents that were read from `path`.
    ///
    /// Relative paths are resolved against `cwd`.
    pub fn parse(contents: &str, format: Format, path: &Path, cwd: &Path) -> Result<Self> {
        let file: MappingFile = match format {
            Format::Yaml => serde_yaml::from_str(contents).map_err(ConfigError::Yaml)?,
            Format::Toml => toml::from_str(contents).map_err(ConfigError::Toml)?,
        };

        let config_dir = path::absolutize(cwd, &path::base_of(path));
        let base_path = match file.base_path {
            Some(base) if !base.as_os_str().is_empty() => path::absolutize(&config_dir, &base),
            _ => config_dir,
        };

        let config = Self {
            base_path,
            storage: file.storage.unwrap_or_default(),
            files: descriptors(file.files)?,
            env_vars: descriptors(file.env_vars)?,
        };

        debug!(
            base_path = %config.base_path.display(),
            files = config.files.len(),
            env_vars = config.env_vars.len(),
            "config loaded"
        );

        Ok(config)
    }

    /// Local path of a file secret.
    pub fn local_path(&self, name: &str) -> PathBuf {
        path::normalize(&self.base_path, name)
    }

    /// Apply command-line overrides. Runs once, before any backend is built.
    pub fn apply(&mut self, overrides: Overrides) {
        let vault = &mut self.storage.vault;
        set_if_present(&mut vault.addr, non_empty(overrides.vault_addr));
        set_if_present(&mut vault.token, non_empty(overrides.vault_token));
        set_if_present(&mut vault.ca_cert, overrides.vault_ca_cert);
        set_if_present(&mut vault.ca_path, overrides.vault_ca_path);
        set_if_present(&mut vault.client_cert, overrides.vault_client_cert);
        set_if_present(&mut vault.client_key, overrides.vault_client_key);
        if overrides.vault_tls_skip_verify {
            vault.tls_skip_verify = true;
        }

        let gpg = &mut self.storage.gpg;
        if !overrides.gpg_recipients.is_empty() {
            gpg.recipients = overrides.gpg_recipients;
        }
        if let Some(passphrase) = non_empty(overrides.gpg_passphrase) {
            gpg.passphrase = PassphraseCache::preset(passphrase);
        }
        set_if_present(&mut gpg.command, non_empty(overrides.gpg_command));
    }
}

fn descriptors(
    entries: Option<BTreeMap<String, Option<DescriptorEntry>>>,
) -> Result<BTreeMap<String, SecretDescriptor>> {
    let mut out = BTreeMap::new();
    for (name, entry) in entries.unwrap_or_default() {
        let descriptor = SecretDescriptor::from_entry(&name, entry.unwrap_or_default())?;
        out.insert(name, descriptor);
    }
    Ok(out)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn set_if_present<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
