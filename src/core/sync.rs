//! Pull, push and exec over every secret in a mapping file.
//!
//! Entries are processed in sorted order. `PullOnly` and `Unsupported`
//! outcomes skip the entry; any other error stops the run.

use std::collections::BTreeMap;
use std::process::Command;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::core::config::Config;
use crate::core::domain::{Outcome, SecretKind, SkipReason, SyncReport};
use crate::core::local;
use crate::core::storage::Storage;
use crate::error::{Error, Result, StorageError};

/// Skip reason for a recoverable storage error.
fn skip_reason(err: &Error) -> Option<SkipReason> {
    match err.storage_kind()? {
        StorageError::PullOnly => Some(SkipReason::PullOnly),
        StorageError::Unsupported => Some(SkipReason::Unsupported),
        _ => None,
    }
}

/// Fetch every file secret and write it under the base path.
///
/// # Errors
///
/// Returns the first non-recoverable storage or local write error.
pub fn pull(config: &Config, storage: &Storage) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    for (name, descriptor) in &config.files {
        let outcome = match storage.read(name, descriptor) {
            Ok(value) => {
                let value = Zeroizing::new(value);
                local::write_file(&config.local_path(name), &value)?;
                Outcome::Pulled
            }
            Err(e) => match skip_reason(&e) {
                Some(SkipReason::Unsupported) => {
                    warn!(secret = %name, "backend unsupported on this platform, skipping");
                    Outcome::Skipped(SkipReason::Unsupported)
                }
                _ => return Err(e),
            },
        };
        report.record(SecretKind::File, name, outcome);
    }

    info!(completed = report.completed(), skipped = report.skipped(), "pull finished");
    Ok(report)
}

/// Store every local file and environment variable in its backend.
///
/// Pull-only entries and entries whose backend can't run here are skipped
/// before the local value is read, so a missing local copy of one is not an
/// error.
///
/// # Errors
///
/// Returns the first local read error or non-recoverable storage error.
pub fn push(config: &Config, storage: &Storage) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    let files = config.files.iter().map(|(n, d)| (SecretKind::File, n, d));
    let env_vars = config.env_vars.iter().map(|(n, d)| (SecretKind::EnvVar, n, d));

    for (kind, name, descriptor) in files.chain(env_vars) {
        if let Err(e) = storage.check_write(name, descriptor) {
            let reason = skip_reason(&e).ok_or(e)?;
            debug!(secret = %name, reason = %reason, "skipping");
            report.record(kind, name, Outcome::Skipped(reason));
            continue;
        }

        let value = Zeroizing::new(match kind {
            SecretKind::File => local::read_file(&config.local_path(name))?,
            SecretKind::EnvVar => local::read_env(name)?,
        });

        let outcome = match storage.write(name, descriptor, &value) {
            Ok(()) => Outcome::Pushed,
            Err(e) => match skip_reason(&e) {
                Some(reason) => Outcome::Skipped(reason),
                None => return Err(e),
            },
        };
        report.record(kind, name, outcome);
    }

    info!(completed = report.completed(), skipped = report.skipped(), "push finished");
    Ok(report)
}

/// Fetch every environment-variable secret.
///
/// # Errors
///
/// Returns the first non-recoverable storage error, or `MalformedValue`
/// for a value that is not valid UTF-8.
pub fn collect_env(
    config: &Config,
    storage: &Storage,
) -> Result<BTreeMap<String, Zeroizing<String>>> {
    let mut vars = BTreeMap::new();

    for (name, descriptor) in &config.env_vars {
        match storage.read(name, descriptor) {
            Ok(value) => {
                let text = String::from_utf8(value).map_err(|e| {
                    e.into_bytes().zeroize();
                    StorageError::MalformedValue(name.clone()).for_secret(name)
                })?;
                vars.insert(name.clone(), Zeroizing::new(text));
            }
            Err(e) if matches!(skip_reason(&e), Some(SkipReason::Unsupported)) => {
                warn!(secret = %name, "backend unsupported on this platform, skipping");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(vars)
}

/// Run `command` with every environment-variable secret set.
///
/// The child inherits stdio. Returns its exit code, or 1 when it was
/// terminated by a signal.
///
/// # Errors
///
/// Returns `Error::NoCommand` for an empty command, a storage error from
/// collecting the variables, or `Error::Io` if the command can't be started.
pub fn exec(config: &Config, storage: &Storage, command: &[String]) -> Result<i32> {
    let (program, args) = command.split_first().ok_or(Error::NoCommand)?;

    let vars = collect_env(config, storage)?;
    debug!(program = %program, vars = vars.len(), "running command");

    let status = Command::new(program)
        .args(args)
        .envs(vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .status()?;

    Ok(status.code().unwrap_or(1))
}
