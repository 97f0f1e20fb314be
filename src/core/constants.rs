//! Constants used throughout secretctl.
//!
//! Centralizes magic strings and configuration values.

/// Default mapping file name (.secret.yml).
pub const CONFIG_FILE: &str = ".secret.yml";

/// Environment variable overriding the mapping file path.
pub const CONFIG_ENV: &str = "SECRETCTL_CONFIG";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SECRETCTL_LOG";

/// Vault token environment variable. Takes precedence over the configured token.
pub const VAULT_TOKEN_ENV: &str = "VAULT_TOKEN";

/// Vault address environment variable. Takes precedence over the configured address.
pub const VAULT_ADDR_ENV: &str = "VAULT_ADDR";

/// Vault TLS environment variables, applied over the mapping file.
pub const VAULT_CACERT_ENV: &str = "VAULT_CACERT";
pub const VAULT_CAPATH_ENV: &str = "VAULT_CAPATH";
pub const VAULT_CLIENT_CERT_ENV: &str = "VAULT_CLIENT_CERT";
pub const VAULT_CLIENT_KEY_ENV: &str = "VAULT_CLIENT_KEY";
pub const VAULT_SKIP_VERIFY_ENV: &str = "VAULT_SKIP_VERIFY";

/// Vault address used when neither config nor environment name one.
pub const VAULT_DEFAULT_ADDR: &str = "https://127.0.0.1:8200";

/// Header carrying the Vault token.
pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

/// Field under which a secret's value is stored in Vault.
pub const VAULT_VALUE_FIELD: &str = "value";

/// Default gpg executable, resolved on PATH.
pub const GPG_COMMAND: &str = "gpg";

/// Keychain service namespace for every stored item.
pub const KEYCHAIN_SERVICE: &str = "secretctl";

/// Mode for directories created for secrets.
pub const PRIVATE_DIR_MODE: u32 = 0o700;

/// Mode for files holding secrets.
pub const PRIVATE_FILE_MODE: u32 = 0o600;
