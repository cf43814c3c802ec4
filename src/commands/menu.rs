//! Menu command implementation
//!
//! Prints one `id<TAB>label<TAB>tip` line per action offered for the selection,
//! and nothing when no action applies.

use crate::cli::MenuArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::extension::BundleExtension;

/// Run menu command
pub fn run(settings: &Settings, args: MenuArgs) -> Result<()> {
    let extension = BundleExtension::from_settings(settings);
    for item in extension.menu_items(&args.paths) {
        println!("{}\t{}\t{}", item.id, item.label, item.tip);
    }
    Ok(())
}
