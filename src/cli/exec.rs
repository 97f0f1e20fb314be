//! Exec command.
//!
//! Runs a command with environment variable secrets set. The exit code of
//! the command becomes the exit code of secretctl.

use crate::cli::Session;
use crate::core::sync;
use crate::error::Result;

/// Run `command` with secrets in its environment.
pub fn execute(session: &Session, command: &[String]) -> Result<i32> {
    sync::exec(&session.config, &session.storage, command)
}
