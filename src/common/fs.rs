//! Common file system operations with unified error handling

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Prefix for staging files and directories created next to their final location
pub const STAGING_PREFIX: &str = ".appbundle-";

/// Ensure parent directory exists for a path
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write a file so that readers only ever see the old content or the complete new content.
///
/// The content goes to a hidden staging file in the same directory, which is then renamed
/// over `path`. `mode` sets the final permission bits on Unix.
pub fn write_atomic(path: &Path, content: &[u8], mode: u32) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".tmp")
        .tempfile_in(dir)?;
    staged.write_all(content)?;
    staged.as_file().sync_all()?;
    set_mode(staged.path(), mode)?;

    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
