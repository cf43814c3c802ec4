//! Copying a bundle tree into the applications directory
//!
//! The tree is first copied into a hidden staging directory next to the target and only
//! renamed into place once every entry has been copied. Any failure or cancellation drops
//! the staging directory, so a partial copy never appears under the target name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;
use walkdir::WalkDir;

use crate::common::fs::STAGING_PREFIX;
use crate::error::{CopyFailure, Result, install};

/// Shared flag the user side sets to stop a running copy
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress callbacks for a running copy
pub trait CopyProgress {
    /// Called once with the number of entries about to be copied
    fn start(&mut self, _total_entries: u64) {}

    /// Called after each file, directory or link has been copied
    fn entry_copied(&mut self, _relative: &Path) {}

    /// Called when the copy has been moved into place
    fn finish(&mut self) {}

    /// Called when the copy stops early
    fn abandon(&mut self) {}
}

/// Progress sink that ignores everything
pub struct NoProgress;

impl CopyProgress for NoProgress {}

/// Copy the tree at `source` to `target`, which must not exist yet.
///
/// Permission bits are preserved and symbolic links are recreated rather than followed.
/// Returns the number of entries copied.
pub fn copy_bundle(
    source: &Path,
    target: &Path,
    cancel: &CancelToken,
    progress: &mut dyn CopyProgress,
) -> Result<u64> {
    let fail = |kind: CopyFailure, reason: String| {
        install::copy_failed(
            source.display().to_string(),
            target.display().to_string(),
            kind,
            reason,
        )
    };
    let fail_io = |err: io::Error| {
        let kind = if source.is_dir() {
            CopyFailure::from_io(&err)
        } else {
            CopyFailure::SourceVanished
        };
        fail(kind, err.to_string())
    };

    let parent = target
        .parent()
        .ok_or_else(|| fail(CopyFailure::Other, "target has no parent directory".to_string()))?;
    fs::create_dir_all(parent).map_err(|e| fail(CopyFailure::from_io(&e), e.to_string()))?;

    let total = count_entries(source).map_err(fail_io)?;
    progress.start(total);

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)
        .map_err(|e| fail(CopyFailure::from_io(&e), e.to_string()))?;

    let copied = match copy_entries(source, staging.path(), cancel, progress) {
        Ok(copied) => copied,
        Err(CopyStop::Cancelled) => {
            progress.abandon();
            return Err(fail(CopyFailure::Cancelled, "copy interrupted by user".to_string()));
        }
        Err(CopyStop::Io(err)) => {
            progress.abandon();
            return Err(fail_io(err));
        }
    };

    fs::rename(staging.path(), target).map_err(|e| {
        progress.abandon();
        fail(CopyFailure::from_io(&e), e.to_string())
    })?;
    // The staging directory has been renamed away; dropping it finds nothing to remove.
    drop(staging);

    progress.finish();
    debug!(source = %source.display(), target = %target.display(), copied, "bundle copied");
    Ok(copied)
}

enum CopyStop {
    Cancelled,
    Io(io::Error),
}

impl From<io::Error> for CopyStop {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<walkdir::Error> for CopyStop {
    fn from(err: walkdir::Error) -> Self {
        Self::Io(err.into())
    }
}

fn count_entries(source: &Path) -> io::Result<u64> {
    let mut total = 0;
    for entry in WalkDir::new(source).min_depth(1) {
        entry?;
        total += 1;
    }
    Ok(total)
}

fn copy_entries(
    source: &Path,
    staging: &Path,
    cancel: &CancelToken,
    progress: &mut dyn CopyProgress,
) -> std::result::Result<u64, CopyStop> {
    let mut copied = 0;
    // Directory permissions are applied last so read-only directories can still be filled.
    let mut dir_permissions: Vec<(PathBuf, fs::Permissions)> =
        vec![(staging.to_path_buf(), fs::metadata(source)?.permissions())];

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        if cancel.is_cancelled() {
            return Err(CopyStop::Cancelled);
        }

        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let dest = staging.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir(&dest)?;
            dir_permissions.push((dest, entry.metadata()?.permissions()));
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }

        copied += 1;
        progress.entry_copied(relative);
    }

    for (dir, permissions) in dir_permissions.into_iter().rev() {
        fs::set_permissions(dir, permissions)?;
    }

    Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(link: &Path, dest: &Path) -> io::Result<()> {
    let pointee = fs::read_link(link)?;
    std::os::unix::fs::symlink(pointee, dest)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(link, dest).map(|_| ())
}
