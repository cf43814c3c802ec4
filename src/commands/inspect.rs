//! Inspect command implementation
//!
//! Prints the fields read from a bundle's descriptor, where the bundle would be
//! installed, and the icon it resolves to.

use console::Style;

use crate::cli::PathArgs;
use crate::config::Settings;
use crate::desktop_entry::exec;
use crate::error::Result;

use super::{field, require_bundle};

/// Run inspect command
pub fn run(settings: &Settings, args: PathArgs) -> Result<()> {
    let descriptor = require_bundle(&args.path)?;
    let installer = settings.installer();

    println!(
        "  {}",
        Style::new().bold().yellow().apply_to(&descriptor.display_name)
    );
    field("Bundle", descriptor.bundle_path.display());
    field("Descriptor", descriptor.descriptor_path.display());
    field("Executable", descriptor.executable_path().display());
    if !descriptor.exec_args.is_empty() {
        field("Arguments", exec::join(&descriptor.exec_args));
    }
    if let Some(comment) = &descriptor.comment {
        field("Comment", comment);
    }
    field("Icon", installer.resolver().resolve(&descriptor));
    field("Terminal", descriptor.terminal);
    field("Categories", &descriptor.categories);
    field("Install path", installer.target_bundle_path(&descriptor).display());
    field(
        "Desktop entry",
        installer.desktop_entry_path(&descriptor).display(),
    );

    Ok(())
}
