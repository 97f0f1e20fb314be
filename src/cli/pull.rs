//! Pull command.
//!
//! Fetches every file secret from its backend into the workspace.

use tracing::info;

use crate::cli::{output, Session};
use crate::core::sync;
use crate::error::Result;

/// Pull every file secret.
pub fn execute(session: &Session) -> Result<i32> {
    info!(files = session.config.files.len(), "running pull");

    let report = sync::pull(&session.config, &session.storage)?;
    output::report(&report, "pulled");
    Ok(0)
}
