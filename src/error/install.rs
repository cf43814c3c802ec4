//! Installation and launch errors

use super::{AppBundleError, CopyFailure};

/// Creates a copy failed error
pub fn copy_failed(
    source_path: impl Into<String>,
    target: impl Into<String>,
    kind: CopyFailure,
    reason: impl Into<String>,
) -> AppBundleError {
    AppBundleError::CopyFailed {
        source_path: source_path.into(),
        target: target.into(),
        kind,
        reason: reason.into(),
    }
}

/// Creates a desktop entry write failed error
pub fn entry_write_failed(path: impl Into<String>, reason: impl Into<String>) -> AppBundleError {
    AppBundleError::DesktopEntryWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an error for an install name already owned by a different bundle
pub fn name_taken(target: impl Into<String>, owner: impl Into<String>) -> AppBundleError {
    AppBundleError::InstallNameTaken {
        target: target.into(),
        owner: owner.into(),
    }
}

/// Creates an install-in-progress error
pub fn in_progress(path: impl Into<String>) -> AppBundleError {
    AppBundleError::InstallInProgress { path: path.into() }
}

/// Creates a launch failed error
pub fn launch_failed(path: impl Into<String>, reason: impl Into<String>) -> AppBundleError {
    AppBundleError::LaunchFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
