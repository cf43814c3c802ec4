//! Configuration and prompt-state errors

use super::AppBundleError;

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> AppBundleError {
    AppBundleError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> AppBundleError {
    AppBundleError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a directory unavailable error
pub fn dir_unavailable(name: impl Into<String>) -> AppBundleError {
    AppBundleError::DirectoryUnavailable { name: name.into() }
}

/// Creates a prompt state read error
pub fn state_read_failed(path: impl Into<String>, reason: impl Into<String>) -> AppBundleError {
    AppBundleError::StateReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a prompt state write error
pub fn state_write_failed(path: impl Into<String>, reason: impl Into<String>) -> AppBundleError {
    AppBundleError::StateWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
