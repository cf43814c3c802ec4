//! appbundle - self-contained `.app` bundles on Linux desktops
//!
//! Recognizes folders ending in `.app` that carry a desktop entry, resolves their icons,
//! launches them, and installs them into `~/Applications` with a desktop entry so they
//! show up in application menus.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod bundle;
mod cli;
mod commands;
mod common;
mod config;
mod desktop_entry;
mod error;
mod extension;
mod host;
mod icon;
mod installer;
mod path_utils;
mod state;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands, GlobalArgs};
use config::{Overrides, Settings};
use error::Result;

/// Environment variable holding the log filter
const LOG_ENV: &str = "APPBUNDLE_LOG";

/// Log to stderr; `--verbose` wins over `APPBUNDLE_LOG`, which defaults to warnings only
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn overrides(global: &GlobalArgs) -> Overrides {
    Overrides {
        config_file: global.config.clone(),
        applications_dir: global.applications_dir.clone(),
        entries_dir: global.entries_dir.clone(),
        state_file: global.state_file.clone(),
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = || Settings::load(&overrides(&cli.global));

    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(&settings()?, args),
        Commands::Icon(args) => commands::icon::run(&settings()?, args),
        Commands::Status(args) => commands::status::run(&settings()?, args),
        Commands::Menu(args) => commands::menu::run(&settings()?, args),
        Commands::Install(args) => commands::install::run(&settings()?, args),
        Commands::Launch(args) => commands::launch::run(&settings()?, args),
        Commands::Forget(args) => commands::forget::run(&settings()?, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if let Err(e) = run(cli) {
        if !e.is_reported() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
