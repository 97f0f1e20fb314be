//! secretctl - Move secrets between a workspace and the stores that hold them.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use secretctl::cli::output;
use secretctl::cli::{execute, Cli};
use secretctl::core::constants;
use secretctl::error::{ConfigError, Error, StorageError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("secretctl=debug")
        } else {
            EnvFilter::new("secretctl=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    match execute(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let suggestion = match &e {
                Error::Config(ConfigError::ReadFile { .. }) => {
                    Some("create .secret.yml or pass --config")
                }
                Error::Config(ConfigError::Vault(_)) => {
                    Some("check storage.vault and the VAULT_* environment variables")
                }
                Error::Secret { source, .. } => match source {
                    StorageError::NoRecipients => Some("set storage.gpg.recipients or pass --gpg-recipient"),
                    StorageError::NoParameter => Some("add a vault, gpg or keychain entry for this secret"),
                    _ => None,
                },
                _ => None,
            };

            output::error(&e.to_string());
            if let Some(hint) = suggestion {
                output::hint(hint);
            }
            std::process::exit(1);
        }
    }
}
