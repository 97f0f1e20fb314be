//! Locator path resolution.
//!
//! Relative locators are resolved against the base path derived from the
//! mapping file. Empty locators mean "not configured" and are left alone.

use std::path::{Path, PathBuf};

/// Resolve `locator` against `base` unless it is empty or already absolute.
///
/// Normalizing an already-normalized locator with the same base is a no-op.
pub fn normalize(base: &Path, locator: impl AsRef<Path>) -> PathBuf {
    let locator = locator.as_ref();
    if locator.as_os_str().is_empty() || locator.is_absolute() {
        return locator.to_path_buf();
    }
    base.join(locator)
}

/// Base path for a mapping file: its parent directory, or `.` when it has none.
pub fn base_of(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Make `path` absolute against `cwd`. Idempotence of [`normalize`] relies
/// on an absolute base.
pub fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let mut out = cwd.to_path_buf();
    for part in path.components() {
        match part {
            std::path::Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}
