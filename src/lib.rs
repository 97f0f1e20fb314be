//! secretctl - Move secrets between a workspace and the stores that hold them.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── pull          # Fetch file secrets into the workspace
//! │   ├── push          # Store local files and env vars remotely
//! │   ├── exec          # Run with env var secrets injected
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # .secret.yml loading and overrides
//!     ├── domain/       # Descriptors and sync reports
//!     ├── path          # Locator normalization
//!     ├── local         # Local files and environment
//!     ├── storage/      # Backends and dispatch
//!     │   ├── mod       # Backend trait, Storage dispatcher
//!     │   ├── vault     # Vault KV over HTTPS
//!     │   ├── gpg       # gpg-encrypted files
//!     │   └── keychain  # macOS Keychain
//!     └── sync          # pull, push, exec
//! ```
//!
//! # Features
//!
//! - One mapping file for file and environment-variable secrets
//! - Vault, gpg and macOS Keychain backends
//! - Pull-only entries that are never written back
//! - Entries for unsupported backends are skipped, not fatal

pub mod cli;
pub mod core;
pub mod error;
