//! Local side of a secret: plain files and process environment variables.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::trace;

use crate::core::constants;
use crate::error::LocalError;

/// Read a local secret file.
pub fn read_file(path: &Path) -> Result<Vec<u8>, LocalError> {
    trace!(path = %path.display(), "reading local file");
    fs::read(path).map_err(|source| LocalError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a local secret file, creating parent directories as needed.
///
/// Directories are created `0700` and the file `0600` on Unix.
pub fn write_file(path: &Path, data: &[u8]) -> Result<(), LocalError> {
    trace!(path = %path.display(), len = data.len(), "writing local file");
    let wrap = |source| LocalError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_private_dir(dir).map_err(wrap)?;
    }
    write_private(path, data).map_err(wrap)
}

/// Read an environment-variable secret. Unset and empty are both errors.
pub fn read_env(name: &str) -> Result<Vec<u8>, LocalError> {
    match std::env::var_os(name) {
        Some(value) if !value.is_empty() => Ok(value.to_string_lossy().into_owned().into_bytes()),
        _ => Err(LocalError::EnvVarNotSet(name.to_string())),
    }
}

/// Create `dir` and any missing parents with owner-only access.
pub fn create_private_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(constants::PRIVATE_DIR_MODE);
    }
    builder.create(dir)
}

/// Truncate-or-create `path` with owner-only permissions and write `data`.
pub fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(constants::PRIVATE_FILE_MODE);
    }

    let mut file = options.open(path)?;

    // An existing file keeps its old mode through open(); tighten it.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(constants::PRIVATE_FILE_MODE))?;
    }

    file.write_all(data)?;
    file.flush()
}
