//! Status command implementation

use crate::cli::PathArgs;
use crate::config::Settings;
use crate::error::{Result, descriptor};
use crate::extension::{BundleExtension, BundleStatus};
use crate::state::PromptState;

use super::field;

/// Run status command
pub fn run(settings: &Settings, args: PathArgs) -> Result<()> {
    let extension = BundleExtension::from_settings(settings);

    match extension.status(&args.path) {
        BundleStatus::Unrecognized => {
            return Err(descriptor::not_a_bundle(args.path.display().to_string()));
        }
        BundleStatus::Malformed(reason) => {
            println!("malformed");
            field("Reason", reason);
        }
        BundleStatus::Recognized {
            descriptor,
            state,
            installing,
        } => {
            println!("{}", state.as_str());
            if state == PromptState::Installed {
                let installer = extension.installer();
                field("Installed at", installer.target_bundle_path(&descriptor).display());
                field(
                    "Desktop entry",
                    installer.desktop_entry_path(&descriptor).display(),
                );
            }
            if installing {
                field("Note", "an install is in progress");
            }
        }
    }
    Ok(())
}
