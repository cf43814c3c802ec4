//! Icon command implementation

use crate::cli::IconArgs;
use crate::config::Settings;
use crate::error::Result;

use super::require_bundle;

/// Run icon command
///
/// With `--uri` only file icons print anything: themed and generic icons have no
/// custom-icon URI.
pub fn run(settings: &Settings, args: IconArgs) -> Result<()> {
    let descriptor = require_bundle(&args.path)?;
    let handle = settings.icon_resolver().resolve(&descriptor);

    if args.uri {
        if let Some(uri) = handle.custom_icon_uri() {
            println!("{uri}");
        }
    } else {
        println!("{}", handle.desktop_value());
    }
    Ok(())
}
