//! Command-line interface.

pub mod completions;
pub mod exec;
pub mod output;
pub mod pull;
pub mod push;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::core::config::{Config, Overrides};
use crate::core::constants;
use crate::core::storage::Storage;
use crate::error::Result;

/// secretctl - Move secrets between a workspace and the stores that hold them.
#[derive(Parser)]
#[command(
    name = "secretctl",
    about = "Pull and push secrets from Vault, gpg and the macOS Keychain",
    version
)]
pub struct Cli {
    /// Mapping file
    #[arg(
        short,
        long,
        global = true,
        env = constants::CONFIG_ENV,
        default_value = constants::CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Storage settings that override the mapping file.
#[derive(Args, Debug, Default)]
pub struct StorageArgs {
    /// Vault server address
    #[arg(long, global = true, value_name = "URL")]
    pub vault_addr: Option<String>,

    /// Vault token (VAULT_TOKEN takes precedence)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub vault_token: Option<String>,

    /// PEM CA certificate for Vault
    #[arg(long, global = true, value_name = "FILE")]
    pub vault_ca_cert: Option<PathBuf>,

    /// Directory of PEM CA certificates for Vault
    #[arg(long, global = true, value_name = "DIR")]
    pub vault_ca_path: Option<PathBuf>,

    /// PEM client certificate for Vault
    #[arg(long, global = true, value_name = "FILE")]
    pub vault_client_cert: Option<PathBuf>,

    /// PEM client key for Vault
    #[arg(long, global = true, value_name = "FILE")]
    pub vault_client_key: Option<PathBuf>,

    /// Skip Vault TLS verification
    #[arg(long, global = true)]
    pub vault_tls_skip_verify: bool,

    /// gpg recipient (repeatable)
    #[arg(long = "gpg-recipient", global = true, value_name = "ID")]
    pub gpg_recipients: Vec<String>,

    /// Passphrase for the gpg secret key
    #[arg(long, global = true, value_name = "PASSPHRASE")]
    pub gpg_passphrase: Option<String>,

    /// gpg executable
    #[arg(long, global = true, value_name = "PATH")]
    pub gpg_command: Option<String>,
}

impl From<StorageArgs> for Overrides {
    fn from(args: StorageArgs) -> Self {
        Self {
            vault_addr: args.vault_addr,
            vault_token: args.vault_token,
            vault_ca_cert: args.vault_ca_cert,
            vault_ca_path: args.vault_ca_path,
            vault_client_cert: args.vault_client_cert,
            vault_client_key: args.vault_client_key,
            vault_tls_skip_verify: args.vault_tls_skip_verify,
            gpg_recipients: args.gpg_recipients,
            gpg_passphrase: args.gpg_passphrase,
            gpg_command: args.gpg_command,
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Fetch every file secret into the workspace
    Pull,

    /// Store local files and environment variables in their backends
    Push,

    /// Run a command with environment variable secrets set
    Exec {
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Loaded mapping file with overrides applied, and its backends.
pub struct Session {
    pub config: Config,
    pub storage: Storage,
}

impl Session {
    /// Load the mapping file, apply overrides and build every backend.
    pub fn open(path: &Path, overrides: Overrides) -> Result<Self> {
        let mut config = Config::load(path)?;
        config.apply(overrides);
        let storage = Storage::new(&config)?;
        Ok(Self { config, storage })
    }
}

/// Execute a command. Returns the process exit code.
pub fn execute(cli: Cli) -> Result<i32> {
    let Cli {
        config,
        storage,
        command,
        ..
    } = cli;

    match command {
        Command::Pull => pull::execute(&Session::open(&config, storage.into())?),
        Command::Push => push::execute(&Session::open(&config, storage.into())?),
        Command::Exec { command } => exec::execute(&Session::open(&config, storage.into())?, &command),
        Command::Completions { shell } => completions::execute(shell).map(|()| 0),
    }
}
