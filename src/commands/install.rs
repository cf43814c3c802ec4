//! Install command implementation
//!
//! Copies a bundle into the applications directory and writes its desktop entry,
//! with a progress bar that Ctrl-C cancels.

use console::Style;
use tracing::warn;

use crate::cli::InstallArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::extension::{INSTALL_HEADING, install_prompt_body};
use crate::host::{Answer, ConfirmPrompt, TerminalPrompt};
use crate::ui::CopyProgressBar;

use super::{field, interruptible, require_bundle};

/// Run install command
pub fn run(settings: &Settings, args: InstallArgs) -> Result<()> {
    let descriptor = require_bundle(&args.path)?;
    let installer = settings.installer();

    if installer.is_installed(&descriptor) {
        println!(
            "{} is already installed at {}",
            descriptor.display_name,
            installer.target_bundle_path(&descriptor).display()
        );
        return Ok(());
    }

    if !args.yes {
        let answer = TerminalPrompt.confirm(INSTALL_HEADING, &install_prompt_body(&descriptor))?;
        if answer != Answer::Yes {
            println!("Installation cancelled.");
            return Ok(());
        }
    }

    let cancel = interruptible();
    let mut progress = CopyProgressBar::new(&descriptor.display_name);
    let installed = installer.install_with(&descriptor, &cancel, &mut progress)?;

    if let Err(e) = settings.ledger().forget(&descriptor.bundle_path) {
        warn!(error = %e, "could not clear declined prompt");
    }

    if !installed.changed {
        println!("{} was installed meanwhile", descriptor.display_name);
        return Ok(());
    }
    println!(
        "{} {}",
        Style::new().green().bold().apply_to("Installed"),
        descriptor.display_name
    );
    field("Bundle", installed.bundle_path.display());
    field("Desktop entry", installed.desktop_entry_path.display());
    if !installed.copied {
        field("Note", "an existing copy was reused");
    }
    Ok(())
}
