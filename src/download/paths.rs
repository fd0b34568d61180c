//! Destination path helpers.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Builds `<base>.<extension>`.
///
/// The extension is appended, never substituted: `clips/take.v2` with `mp4`
/// becomes `clips/take.v2.mp4`.
#[must_use]
pub fn destination_path(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Creates every missing parent directory of `path`.
///
/// # Errors
///
/// Returns the underlying IO error if a directory cannot be created.
pub async fn ensure_parent_dirs(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
