//! Error types and handling for appbundle
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Constructors are grouped by the area that raises them:
//! - [`descriptor`]: bundle descriptor errors
//! - [`install`]: copy, registration and launch errors
//! - [`config`]: configuration and prompt-state errors

pub mod config;
pub mod descriptor;
pub mod install;

use std::fmt;
use std::io;

use miette::Diagnostic;
use thiserror::Error;

/// `ENOSPC` / `EDQUOT` on Linux, for kernels or targets where the error kind is not mapped
const RAW_NO_SPACE: i32 = 28;
const RAW_QUOTA_EXCEEDED: i32 = 122;

/// Why copying a bundle into the applications directory stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFailure {
    /// Source unreadable or target not writable
    PermissionDenied,
    /// Target file system is full or over quota
    NoSpace,
    /// The source bundle disappeared while it was being copied
    SourceVanished,
    /// The user interrupted the copy
    Cancelled,
    /// Any other I/O failure
    Other,
}

impl CopyFailure {
    /// Classify an I/O error raised while copying
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
                Self::PermissionDenied
            }
            io::ErrorKind::StorageFull => Self::NoSpace,
            io::ErrorKind::NotFound => Self::SourceVanished,
            _ => match err.raw_os_error() {
                Some(RAW_NO_SPACE | RAW_QUOTA_EXCEEDED) => Self::NoSpace,
                _ => Self::Other,
            },
        }
    }
}

impl fmt::Display for CopyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::PermissionDenied => "permission denied",
            Self::NoSpace => "not enough disk space",
            Self::SourceVanished => "source bundle vanished during copy",
            Self::Cancelled => "cancelled",
            Self::Other => "I/O error",
        };
        f.write_str(text)
    }
}

/// Main error type for appbundle operations
#[derive(Error, Diagnostic, Debug)]
pub enum AppBundleError {
    // Bundle errors
    #[error("'{path}' is not an application bundle")]
    #[diagnostic(
        code(appbundle::bundle::not_a_bundle),
        help("Bundles are directories ending in .app that contain a .desktop file")
    )]
    NotABundle { path: String },

    #[error("Failed to parse bundle descriptor: {path}: {reason}")]
    #[diagnostic(
        code(appbundle::descriptor::parse_failed),
        help("The bundle is treated as an ordinary folder until its .desktop file is fixed")
    )]
    DescriptorParse { path: String, reason: String },

    // Install errors
    #[error("Failed to copy '{source_path}' to '{target}' ({kind}): {reason}")]
    #[diagnostic(
        code(appbundle::install::copy_failed),
        help("Nothing was installed; fix the problem and try again")
    )]
    CopyFailed {
        source_path: String,
        target: String,
        kind: CopyFailure,
        reason: String,
    },

    #[error("Failed to write desktop entry: {path}: {reason}")]
    #[diagnostic(
        code(appbundle::install::entry_write_failed),
        help(
            "The application was copied but is not registered in the applications menu. \
             Retry the installation or remove the copied bundle manually"
        )
    )]
    DesktopEntryWriteFailed { path: String, reason: String },

    #[error("'{target}' is already installed from another bundle: {owner}")]
    #[diagnostic(
        code(appbundle::install::name_taken),
        help("Uninstall the other application or rename this bundle's Name= entry")
    )]
    InstallNameTaken { target: String, owner: String },

    #[error("An installation of '{path}' is already in progress")]
    #[diagnostic(code(appbundle::install::in_progress))]
    InstallInProgress { path: String },

    #[error("Failed to launch '{path}': {reason}")]
    #[diagnostic(code(appbundle::launch::failed))]
    LaunchFailed { path: String, reason: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(appbundle::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(appbundle::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Could not determine the {name} directory")]
    #[diagnostic(
        code(appbundle::config::dir_unavailable),
        help("Set HOME, or pass the directory explicitly")
    )]
    DirectoryUnavailable { name: String },

    // Prompt state errors
    #[error("Failed to read prompt state: {path}: {reason}")]
    #[diagnostic(code(appbundle::state::read_failed))]
    StateReadFailed { path: String, reason: String },

    #[error("Failed to write prompt state: {path}: {reason}")]
    #[diagnostic(code(appbundle::state::write_failed))]
    StateWriteFailed { path: String, reason: String },

    #[error("Failed to read confirmation: {reason}")]
    #[diagnostic(code(appbundle::prompt::failed))]
    PromptFailed { reason: String },

    #[error("{action} failed")]
    AlreadyReported { action: String },
}

impl AppBundleError {
    /// Short heading used when the error is shown to the user as a notification
    pub fn heading(&self) -> &'static str {
        match self {
            Self::CopyFailed { .. }
            | Self::DesktopEntryWriteFailed { .. }
            | Self::InstallNameTaken { .. }
            | Self::InstallInProgress { .. } => "Installation Error",
            Self::LaunchFailed { .. } => "Launch Error",
            Self::NotABundle { .. } | Self::DescriptorParse { .. } => "Bundle Error",
            _ => "Error",
        }
    }

    /// Whether the user has already seen this failure
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::AlreadyReported { .. })
    }

    /// Marks a failure of `action` that was already shown to the user
    pub fn reported(action: impl Into<String>) -> Self {
        Self::AlreadyReported {
            action: action.into(),
        }
    }
}

impl From<serde_yaml::Error> for AppBundleError {
    fn from(err: serde_yaml::Error) -> Self {
        AppBundleError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for AppBundleError {
    fn from(err: inquire::InquireError) -> Self {
        AppBundleError::PromptFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, AppBundleError>;
