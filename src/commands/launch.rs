//! Launch command implementation
//!
//! Runs the same flow a file manager runs for "Launch Application": installed bundles
//! start from their installed copy, others may first be offered for installation.

use console::Style;

use crate::cli::LaunchArgs;
use crate::config::Settings;
use crate::error::{AppBundleError, Result, descriptor};
use crate::extension::{BundleExtension, Host, LaunchOutcome};
use crate::host::{Answer, ConfirmPrompt, FixedAnswer, TerminalNotifier, TerminalPrompt};
use crate::ui::CopyProgressBar;

use super::{field, interruptible};

/// Run launch command
pub fn run(settings: &Settings, args: LaunchArgs) -> Result<()> {
    let extension = BundleExtension::from_settings(settings);
    let prompt: Box<dyn ConfirmPrompt> = if args.yes {
        Box::new(FixedAnswer(Answer::Yes))
    } else if args.no {
        Box::new(FixedAnswer(Answer::No))
    } else {
        Box::new(TerminalPrompt)
    };
    let host = Host {
        prompt: prompt.as_ref(),
        notifier: &TerminalNotifier,
    };

    let name = args
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cancel = interruptible();
    let mut progress = CopyProgressBar::new(&name);

    match extension.activate_launch(&args.path, &host, &cancel, &mut progress) {
        LaunchOutcome::NotABundle => Err(descriptor::not_a_bundle(args.path.display().to_string())),
        LaunchOutcome::Launched { process, installed } => {
            println!(
                "{} {}",
                Style::new().green().bold().apply_to("Launched"),
                process.executable.display()
            );
            field("PID", process.pid);
            if installed {
                field("From", "installed copy");
            }
            Ok(())
        }
        LaunchOutcome::Dismissed => {
            println!("Launch cancelled.");
            Ok(())
        }
        // The notifier has shown the cause
        LaunchOutcome::Failed => Err(AppBundleError::reported("Launch")),
    }
}
