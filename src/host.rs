//! Interfaces to the host file manager
//!
//! The core only asks the host two things: a yes/no confirmation and a way to show an
//! alert. Terminal implementations back the command line; a file-manager plugin would
//! implement the same traits with its own dialogs.

use std::io::IsTerminal;

use console::Style;
use inquire::{Confirm, InquireError};

use crate::error::Result;

/// The user's response to a confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// The prompt was closed without answering
    Dismissed,
}

/// Yes/no confirmation dialog
pub trait ConfirmPrompt {
    fn confirm(&self, heading: &str, body: &str) -> Result<Answer>;
}

/// User-visible alert
pub trait Notifier {
    fn notify(&self, heading: &str, body: &str);
}

/// Interactive terminal confirmation
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn confirm(&self, heading: &str, body: &str) -> Result<Answer> {
        if !std::io::stdin().is_terminal() {
            return Err(InquireError::NotTTY.into());
        }

        let bold = Style::new().bold();
        println!("{}", bold.apply_to(heading));
        println!("{body}");
        println!();

        match Confirm::new("Yes, install?")
            .with_default(true)
            .with_help_message("Press Enter to install, 'n' to run without installing, Esc to cancel")
            .prompt()
        {
            Ok(true) => Ok(Answer::Yes),
            Ok(false) => Ok(Answer::No),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Ok(Answer::Dismissed)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Answers every prompt the same way without asking
pub struct FixedAnswer(pub Answer);

impl ConfirmPrompt for FixedAnswer {
    fn confirm(&self, _heading: &str, _body: &str) -> Result<Answer> {
        Ok(self.0)
    }
}

/// Alerts printed to stderr
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, heading: &str, body: &str) {
        let red = Style::new().red().bold();
        eprintln!("{}: {body}", red.apply_to(heading));
    }
}
