//! Command implementations for the appbundle CLI

pub mod completions;
pub mod forget;
pub mod icon;
pub mod inspect;
pub mod install;
pub mod launch;
pub mod menu;
pub mod status;
pub mod version;

use std::path::Path;

use console::Style;
use tracing::warn;

use crate::bundle::{BundleDescriptor, detect};
use crate::error::{Result, descriptor};
use crate::installer::CancelToken;

/// Descriptor of `path`, or an error if it is not a bundle
fn require_bundle(path: &Path) -> Result<BundleDescriptor> {
    detect(path)?
        .into_descriptor()
        .ok_or_else(|| descriptor::not_a_bundle(path.display().to_string()))
}

/// Cancel token tripped by Ctrl-C
fn interruptible() -> CancelToken {
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || on_interrupt.cancel()) {
        warn!(error = %e, "Ctrl-C will not cancel the copy");
    }
    cancel
}

/// Print an indented `label: value` line
fn field(label: &str, value: impl std::fmt::Display) {
    println!("    {} {}", Style::new().bold().apply_to(format!("{label}:")), value);
}
