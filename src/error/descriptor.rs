//! Bundle descriptor errors

use super::AppBundleError;

/// Creates a not-a-bundle error, for commands that require a bundle argument
pub fn not_a_bundle(path: impl Into<String>) -> AppBundleError {
    AppBundleError::NotABundle { path: path.into() }
}

/// Creates a descriptor parse error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> AppBundleError {
    AppBundleError::DescriptorParse {
        path: path.into(),
        reason: reason.into(),
    }
}
