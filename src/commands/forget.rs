//! Forget command implementation

use crate::cli::PathArgs;
use crate::config::Settings;
use crate::error::Result;

/// Run forget command
pub fn run(settings: &Settings, args: PathArgs) -> Result<()> {
    if settings.ledger().forget(&args.path)? {
        println!(
            "Forgot declined install prompt for {}",
            args.path.display()
        );
    } else {
        println!(
            "No declined install prompt recorded for {}",
            args.path.display()
        );
    }
    Ok(())
}
