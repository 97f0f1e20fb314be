//! Vault backend.
//!
//! Reads and writes a single `value` field at a KV path over HTTPS. One
//! round trip per call, no retries.
//!
//! ## Configuration
//!
//! ```yaml
//! storage:
//!   vault:
//!     addr: https://vault.example.com:8200
//!     token: s.xxxxxxxx
//!     ca_cert: certs/ca.pem
//!     client_cert: certs/client.pem
//!     client_key: certs/client-key.pem
//!     tls_skip_verify: false
//! ```
//!
//! `VAULT_ADDR`, `VAULT_TOKEN`, `VAULT_CACERT`, `VAULT_CAPATH`,
//! `VAULT_CLIENT_CERT`, `VAULT_CLIENT_KEY` and `VAULT_SKIP_VERIFY` override
//! the matching settings when set.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Certificate, Identity, Method, StatusCode};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::Backend;
use crate::core::config::VaultConfig;
use crate::core::constants;
use crate::error::{StorageError, StorageResult};

/// One HTTP round trip against the Vault API.
pub trait Transport {
    /// Fetch the response body at `path`, or `None` if Vault has no entry.
    fn get(&self, path: &str) -> StorageResult<Option<Value>>;

    /// Store `body` at `path`.
    fn put(&self, path: &str, body: &Value) -> StorageResult<()>;
}

/// Vault storage backend.
pub struct Vault {
    transport: Box<dyn Transport>,
}

impl Vault {
    /// Build a backend talking HTTPS with the given settings.
    pub fn new(config: &VaultConfig) -> StorageResult<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    /// Backend over any transport, such as an in-memory one.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }
}

/// `/secret/a` and `secret/a` address the same entry.
fn entry_path(path: &str) -> StorageResult<&str> {
    if path.is_empty() {
        return Err(StorageError::PathRequired);
    }
    Ok(path.strip_prefix('/').unwrap_or(path))
}

impl Backend for Vault {
    fn name(&self) -> &'static str {
        "vault"
    }

    fn read(&self, locator: &str) -> StorageResult<Vec<u8>> {
        let path = entry_path(locator)?;
        debug!(path = %path, "reading secret from vault");

        let body = self
            .transport
            .get(path)?
            .ok_or_else(|| StorageError::NotFound(path.to_string()))?;

        let value = body
            .get("data")
            .and_then(|data| data.get(constants::VAULT_VALUE_FIELD))
            .and_then(Value::as_str)
            .ok_or_else(|| StorageError::MalformedValue(path.to_string()))?;

        trace!(path = %path, len = value.len(), "read secret from vault");
        Ok(value.as_bytes().to_vec())
    }

    fn write(&self, locator: &str, data: &[u8]) -> StorageResult<()> {
        let path = entry_path(locator)?;
        debug!(path = %path, len = data.len(), "writing secret to vault");

        let value = std::str::from_utf8(data)
            .map_err(|_| StorageError::MalformedValue(path.to_string()))?;
        let mut body = Map::new();
        body.insert(
            constants::VAULT_VALUE_FIELD.to_string(),
            Value::String(value.to_string()),
        );
        self.transport.put(path, &Value::Object(body))
    }
}

/// Token to send: `VAULT_TOKEN` when set and non-empty, else the configured one.
pub fn resolve_token(env_token: Option<String>, configured: Option<&str>) -> Option<String> {
    env_token
        .filter(|t| !t.is_empty())
        .or_else(|| configured.filter(|t| !t.is_empty()).map(str::to_string))
}

/// Address to talk to: `VAULT_ADDR`, else the configured one, else the local default.
pub fn resolve_addr(env_addr: Option<String>, configured: Option<&str>) -> String {
    env_addr
        .filter(|a| !a.is_empty())
        .or_else(|| configured.filter(|a| !a.is_empty()).map(str::to_string))
        .unwrap_or_else(|| constants::VAULT_DEFAULT_ADDR.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Boolean in the forms the Vault CLI accepts for `VAULT_SKIP_VERIFY`.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Connection settings with the `VAULT_*` environment applied.
///
/// Like the Vault CLI, a set environment variable wins over the mapping
/// file and the command line.
pub struct Settings {
    pub addr: String,
    pub token: Option<String>,
    pub ca_cert: Option<PathBuf>,
    pub ca_path: Option<PathBuf>,
    pub client_cert: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
    pub tls_skip_verify: bool,
}

impl Settings {
    /// Merge `config` with the variables returned by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Client` if `VAULT_SKIP_VERIFY` isn't a boolean.
    pub fn resolve(
        config: &VaultConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> StorageResult<Self> {
        let env = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let path = |name: &str, configured: &Option<PathBuf>| {
            env(name).map(PathBuf::from).or_else(|| configured.clone())
        };

        let tls_skip_verify = match env(constants::VAULT_SKIP_VERIFY_ENV) {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                StorageError::Client(format!(
                    "invalid {}: {}",
                    constants::VAULT_SKIP_VERIFY_ENV,
                    value
                ))
            })?,
            None => config.tls_skip_verify,
        };

        Ok(Self {
            addr: resolve_addr(env(constants::VAULT_ADDR_ENV), config.addr.as_deref()),
            token: resolve_token(env(constants::VAULT_TOKEN_ENV), config.token.as_deref()),
            ca_cert: path(constants::VAULT_CACERT_ENV, &config.ca_cert),
            ca_path: path(constants::VAULT_CAPATH_ENV, &config.ca_path),
            client_cert: path(constants::VAULT_CLIENT_CERT_ENV, &config.client_cert),
            client_key: path(constants::VAULT_CLIENT_KEY_ENV, &config.client_key),
            tls_skip_verify,
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
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

/// HTTPS transport built on a blocking `reqwest` client.
pub struct HttpTransport {
    client: Client,
    addr: String,
    token: Option<String>,
}

impl HttpTransport {
    /// Build a transport from the mapping file settings and the process
    /// environment.
    pub fn new(config: &VaultConfig) -> StorageResult<Self> {
        Self::from_settings(Settings::resolve(config, |name| std::env::var(name).ok())?)
    }

    /// Build the client once; TLS material and skip-verify apply to every call.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Client` for unreadable or invalid TLS material,
    /// or when only one half of the client identity is set.
    pub fn from_settings(settings: Settings) -> StorageResult<Self> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(settings.tls_skip_verify);

        if let Some(ca_cert) = &settings.ca_cert {
            for cert in load_certificates(ca_cert)? {
                builder = builder.add_root_certificate(cert);
            }
        }

        if let Some(ca_path) = &settings.ca_path {
            let entries = std::fs::read_dir(ca_path).map_err(|e| unreadable(ca_path, e))?;
            for entry in entries {
                let path = entry.map_err(|e| unreadable(ca_path, e))?.path();
                if path.is_file() {
                    for cert in load_certificates(&path)? {
                        builder = builder.add_root_certificate(cert);
                    }
                }
            }
        }

        match (&settings.client_cert, &settings.client_key) {
            (Some(cert), Some(key)) => {
                let mut pem = read_pem(cert)?;
                pem.push(b'\n');
                pem.extend(read_pem(key)?);
                let identity = Identity::from_pem(&pem).map_err(|e| {
                    StorageError::Client(format!("invalid client identity: {}", e))
                })?;
                builder = builder.identity(identity);
            }
            (Some(_), None) => {
                return Err(StorageError::Client(
                    "client_cert is set but client_key is missing".to_string(),
                ))
            }
            (None, Some(_)) => {
                return Err(StorageError::Client(
                    "client_key is set but client_cert is missing".to_string(),
                ))
            }
            (None, None) => {}
        }

        let client = builder
            .build()
            .map_err(|e| StorageError::Client(e.to_string()))?;

        debug!(
            addr = %settings.addr,
            token = settings.token.is_some(),
            "vault client configured"
        );
        Ok(Self {
            client,
            addr: settings.addr,
            token: settings.token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/v1/{}", self.addr, path);
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.header(constants::VAULT_TOKEN_HEADER, token),
            None => request,
        }
    }
}

fn unreadable(path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Client(format!("unable to read {}: {}", path.display(), e))
}

fn read_pem(path: &Path) -> StorageResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| unreadable(path, e))
}

fn load_certificates(path: &Path) -> StorageResult<Vec<Certificate>> {
    let pem = read_pem(path)?;
    let certs = Certificate::from_pem_bundle(&pem).map_err(|e| {
        StorageError::Client(format!("invalid certificate {}: {}", path.display(), e))
    })?;
    if certs.is_empty() {
        return Err(StorageError::Client(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(certs)
}

fn network(e: reqwest::Error) -> StorageError {
    StorageError::Network(e.to_string())
}

fn status_error(response: reqwest::blocking::Response) -> StorageError {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    StorageError::Network(format!("{}: {}", status, body.trim()))
}

impl Transport for HttpTransport {
    fn get(&self, path: &str) -> StorageResult<Option<Value>> {
        let response = self.request(Method::GET, path).send().map_err(network)?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => {
                let body = response.bytes().map_err(network)?;
                if body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(None);
                }
                serde_json::from_slice(&body)
                    .map(Some)
                    .map_err(|e| StorageError::Network(format!("invalid response body: {}", e)))
            }
            _ => Err(status_error(response)),
        }
    }

    fn put(&self, path: &str, body: &Value) -> StorageResult<()> {
        let response = self
            .request(Method::PUT, path)
            .json(body)
            .send()
            .map_err(network)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response))
        }
    }
}
