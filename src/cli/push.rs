//! Push command.

use tracing::info;

use crate::cli::{output, Session};
use crate::core::sync;
use crate::error::Result;

/// Push every local file and environment variable to its backend.
pub fn execute(session: &Session) -> Result<i32> {
    info!(
        files = session.config.files.len(),
        env_vars = session.config.env_vars.len(),
        "running push"
    );

    let report = sync::push(&session.config, &session.storage)?;
    output::report(&report, "pushed");
    Ok(0)
}
