//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// appbundle - run and install `.app` bundles on Linux desktops
#[derive(Parser, Debug)]
#[command(
    name = "appbundle",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Run and install self-contained .app bundles",
    long_about = "appbundle recognizes folders ending in .app that carry a desktop entry, \
                  shows their icon, launches them in place, and installs them into \
                  ~/Applications with a launcher in the applications menu.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  appbundle inspect ~/Downloads/Foo.app\n    \
                  appbundle launch ~/Downloads/Foo.app\n    \
                  appbundle install -y ~/Downloads/Foo.app\n    \
                  appbundle status ~/Downloads/Foo.app\n    \
                  appbundle forget ~/Downloads/Foo.app"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ~/.config/appbundle/config.yaml)
    #[arg(long, global = true, env = "APPBUNDLE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where installed bundles are copied
    #[arg(long, global = true, env = "APPBUNDLE_APPLICATIONS_DIR", value_name = "DIR")]
    pub applications_dir: Option<PathBuf>,

    /// Where generated desktop entries are written
    #[arg(long, global = true, env = "APPBUNDLE_ENTRIES_DIR", value_name = "DIR")]
    pub entries_dir: Option<PathBuf>,

    /// File recording declined install prompts
    #[arg(long, global = true, env = "APPBUNDLE_STATE_FILE", value_name = "FILE")]
    pub state_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what the descriptor of a bundle says
    Inspect(PathArgs),

    /// Show the icon a bundle gets
    Icon(IconArgs),

    /// Show whether a bundle is installed or its prompt was declined
    Status(PathArgs),

    /// List the context-menu actions for a selection
    Menu(MenuArgs),

    /// Install a bundle into the applications directory
    Install(InstallArgs),

    /// Launch a bundle, offering to install it first
    Launch(LaunchArgs),

    /// Forget a declined install prompt
    Forget(PathArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// A single bundle path
#[derive(Parser, Debug)]
pub struct PathArgs {
    /// Path of the .app folder
    pub path: PathBuf,
}

/// Arguments for the icon command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show the icon:\n    appbundle icon ~/Downloads/Foo.app\n\n\
                  Print the file manager custom-icon URI:\n    appbundle icon --uri ~/Downloads/Foo.app")]
pub struct IconArgs {
    /// Path of the .app folder
    pub path: PathBuf,

    /// Print the custom-icon URI instead (nothing for themed or generic icons)
    #[arg(long)]
    pub uri: bool,
}

/// Arguments for the menu command
#[derive(Parser, Debug)]
pub struct MenuArgs {
    /// Selected files and folders
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install with confirmation:\n    appbundle install ~/Downloads/Foo.app\n\n\
                  Install without confirmation:\n    appbundle install -y ~/Downloads/Foo.app")]
pub struct InstallArgs {
    /// Path of the .app folder
    pub path: PathBuf,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the launch command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Launch, asking whether to install first:\n    appbundle launch ~/Downloads/Foo.app\n\n\
                  Install if needed and launch the installed copy:\n    appbundle launch --yes ~/Downloads/Foo.app\n\n\
                  Launch in place and remember not to ask:\n    appbundle launch --no ~/Downloads/Foo.app")]
pub struct LaunchArgs {
    /// Path of the .app folder
    pub path: PathBuf,

    /// Answer "yes" to the install prompt
    #[arg(long, conflicts_with = "no")]
    pub yes: bool,

    /// Answer "no" to the install prompt
    #[arg(long)]
    pub no: bool,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    appbundle completions --shell bash > ~/.bash_completion.d/appbundle\n\n\
                  Generate zsh completions:\n    appbundle completions --shell zsh > ~/.zfunc/_appbundle\n\n\
                  Generate fish completions:\n    appbundle completions --shell fish > ~/.config/fish/completions/appbundle.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long, value_enum, ignore_case = true)]
    pub shell: Shell,
}
