//! Secret descriptor.
//!
//! A descriptor names the single backend a secret lives in and whether it
//! may be written back. It is built once from the mapping file and never
//! mutated afterwards.

use serde::Deserialize;
use std::fmt;

use crate::error::ConfigError;

/// Storage backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Vault,
    Keychain,
    Gpg,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Vault => "vault",
            BackendKind::Keychain => "keychain",
            BackendKind::Gpg => "gpg",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which backend holds a secret, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Path in the remote key-value store.
    Vault { path: String },
    /// Label of a credential store item.
    Keychain { label: String },
    /// Path of a gpg-encrypted file, relative to the base path unless absolute.
    Gpg { path: String },
}

impl Selector {
    pub fn kind(&self) -> BackendKind {
        match self {
            Selector::Vault { .. } => BackendKind::Vault,
            Selector::Keychain { .. } => BackendKind::Keychain,
            Selector::Gpg { .. } => BackendKind::Gpg,
        }
    }

    /// Backend-specific address of the secret.
    pub fn locator(&self) -> &str {
        match self {
            Selector::Vault { path } | Selector::Gpg { path } => path,
            Selector::Keychain { label } => label,
        }
    }
}

/// A named secret's storage parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecretDescriptor {
    pull_only: bool,
    selector: Option<Selector>,
}

impl SecretDescriptor {
    pub fn new(selector: Selector) -> Self {
        Self {
            pull_only: false,
            selector: Some(selector),
        }
    }

    /// Descriptor with no backend. Dispatching it fails with `NoParameter`.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn pull_only(mut self, pull_only: bool) -> Self {
        self.pull_only = pull_only;
        self
    }

    pub fn is_pull_only(&self) -> bool {
        self.pull_only
    }

    pub fn selector(&self) -> Option<&Selector> {
        self.selector.as_ref()
    }

    /// Build a descriptor from its mapping file entry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AmbiguousSelector` when the entry names more
    /// than one backend.
    pub fn from_entry(name: &str, entry: DescriptorEntry) -> Result<Self, ConfigError> {
        let mut selectors = Vec::new();
        if let Some(vault) = entry.vault {
            selectors.push(Selector::Vault { path: vault.path });
        }
        if let Some(keychain) = entry.keychain {
            selectors.push(Selector::Keychain {
                label: keychain.label,
            });
        }
        if let Some(gpg) = entry.gpg {
            selectors.push(Selector::Gpg { path: gpg.path });
        }

        if selectors.len() > 1 {
            let backends = selectors
                .iter()
                .map(|s| s.kind().as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ConfigError::AmbiguousSelector {
                name: name.to_string(),
                backends,
            });
        }

        Ok(Self {
            pull_only: entry.pull_only,
            selector: selectors.pop(),
        })
    }
}

/// Descriptor as written in the mapping file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorEntry {
    #[serde(default)]
    pub pull_only: bool,
    pub vault: Option<PathParam>,
    pub keychain: Option<LabelParam>,
    pub gpg: Option<PathParam>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathParam {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelParam {
    #[serde(default)]
    pub label: String,
}
