//! Error types.
//!
//! Storage failures carry a [`StorageError`] kind so callers can tell a
//! skippable outcome (`PullOnly`, `Unsupported`) from one that must abort
//! the run.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A backend operation failed for a named secret.
    #[error("{name}: {source}")]
    Secret {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Local(#[from] LocalError),

    #[error("no command specified")]
    NoCommand,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Storage kind behind this error, if it came from a backend.
    pub fn storage_kind(&self) -> Option<&StorageError> {
        match self {
            Error::Secret { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Whether this error only skips the current entry.
    pub fn is_recoverable(&self) -> bool {
        self.storage_kind()
            .map(StorageError::is_recoverable)
            .unwrap_or(false)
    }
}

/// Mapping file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to load configuration file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unable to parse configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("secret '{name}' selects more than one storage backend ({backends})")]
    AmbiguousSelector { name: String, backends: String },

    #[error("invalid storage.vault settings: {0}")]
    Vault(#[source] StorageError),
}

/// Backend and dispatch failures.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("no storage parameter found")]
    NoParameter,

    #[error("pull only")]
    PullOnly,

    #[error("unsupported on this platform")]
    Unsupported,

    #[error("secret does not exist at {0}")]
    NotFound(String),

    #[error("file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("no usable secret value at {0}")]
    MalformedValue(String),

    #[error("no recipients for encrypted file")]
    NoRecipients,

    #[error("command error:\n{stderr}")]
    Command { stderr: String },

    #[error("vault request failed: {0}")]
    Network(String),

    #[error("unable to configure vault client: {0}")]
    Client(String),

    #[error("keychain error: {0}")]
    Keychain(String),

    #[error("label is required")]
    LabelRequired,

    #[error("path is required")]
    PathRequired,

    #[error("unable to read passphrase: {0}")]
    Prompt(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// `PullOnly` and `Unsupported` skip one entry; everything else aborts.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StorageError::PullOnly | StorageError::Unsupported)
    }

    /// Attach the secret name.
    pub fn for_secret(self, name: impl Into<String>) -> Error {
        Error::Secret {
            name: name.into(),
            source: self,
        }
    }
}

/// Local file and environment failures.
#[derive(Error, Debug)]
pub enum LocalError {
    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("environment variable does not exist: {0}")]
    EnvVarNotSet(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub type StorageResult<T> = std::result::Result<T, StorageError>;
