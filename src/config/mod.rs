//! Settings resolution
//!
//! Settings come from three layers, later layers winning:
//! 1. Defaults derived from the user's home and XDG directories
//! 2. The optional YAML configuration file
//! 3. Command line flags and their environment variables

pub mod file;

use std::path::{Path, PathBuf};

use tracing::debug;

pub use file::{ConfigFile, DeclinePolicy};

use crate::error::{Result, config};
use crate::icon::IconResolver;
use crate::installer::{InstallLayout, Installer};
use crate::path_utils::expand_tilde;
use crate::state::PromptLedger;

/// Directory name used under the user's config directory
const APP_DIR: &str = "appbundle";

/// Configuration file name
const CONFIG_FILE: &str = "config.yaml";

/// Prompt ledger file name
const STATE_FILE: &str = "prompted.json";

/// Used when `XDG_DATA_DIRS` is unset or empty
const DEFAULT_DATA_DIRS: &str = "/usr/local/share:/usr/share";

const PIXMAPS_DIR: &str = "/usr/share/pixmaps";

/// Values given on the command line (or through their environment variables)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub applications_dir: Option<PathBuf>,
    pub entries_dir: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub applications_dir: PathBuf,
    pub entries_dir: PathBuf,
    pub state_file: PathBuf,
    pub decline_policy: DeclinePolicy,
    pub icon_dirs: Vec<PathBuf>,
    pub icon_theme: Option<String>,
}

impl Settings {
    /// Resolve settings from defaults, the config file and `overrides`.
    ///
    /// An explicitly named config file must exist; the default one is optional.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let file = match &overrides.config_file {
            Some(path) => ConfigFile::load(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => ConfigFile::load(&path)?,
                _ => ConfigFile::default(),
            },
        };
        Self::resolve(Self::defaults()?, &file, overrides)
    }

    /// Defaults: `~/Applications`, `~/.local/share/applications`,
    /// `~/.config/appbundle/prompted.json`
    pub fn defaults() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| config::dir_unavailable("home"))?;
        let data_dir = dirs::data_dir().unwrap_or_else(|| home.join(".local").join("share"));
        let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));

        Ok(Self {
            applications_dir: home.join("Applications"),
            entries_dir: data_dir.join("applications"),
            state_file: config_dir.join(APP_DIR).join(STATE_FILE),
            decline_policy: DeclinePolicy::default(),
            icon_dirs: default_icon_dirs(&data_dir),
            icon_theme: None,
        })
    }

    /// Layer `file` and `overrides` over `base`
    pub fn resolve(base: Self, file: &ConfigFile, overrides: &Overrides) -> Result<Self> {
        let pick = |flag: &Option<PathBuf>, from_file: &Option<String>, default: PathBuf| {
            flag.clone()
                .or_else(|| from_file.as_deref().map(expand_tilde))
                .unwrap_or(default)
        };

        let settings = Self {
            applications_dir: pick(
                &overrides.applications_dir,
                &file.applications_dir,
                base.applications_dir,
            ),
            entries_dir: pick(&overrides.entries_dir, &file.entries_dir, base.entries_dir),
            state_file: pick(&overrides.state_file, &file.state_file, base.state_file),
            decline_policy: file.decline_policy.unwrap_or(base.decline_policy),
            icon_dirs: file.icon_dirs.as_ref().map_or(base.icon_dirs, |listed| {
                listed.iter().map(|d| expand_tilde(d)).collect()
            }),
            icon_theme: file.icon_theme.clone().or(base.icon_theme),
        };
        debug!(?settings, "settings resolved");
        Ok(settings)
    }

    pub fn layout(&self) -> InstallLayout {
        InstallLayout {
            applications_dir: self.applications_dir.clone(),
            entries_dir: self.entries_dir.clone(),
        }
    }

    pub fn icon_resolver(&self) -> IconResolver {
        IconResolver::new(self.icon_dirs.clone(), self.icon_theme.clone())
    }

    pub fn installer(&self) -> Installer {
        Installer::new(self.layout(), self.icon_resolver())
    }

    pub fn ledger(&self) -> PromptLedger {
        PromptLedger::new(&self.state_file)
    }
}

/// `~/.config/appbundle/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// User icons first, then each `XDG_DATA_DIRS` entry, then the pixmaps directory
fn default_icon_dirs(data_dir: &Path) -> Vec<PathBuf> {
    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_DIRS.to_string());

    let mut icon_dirs = vec![data_dir.join("icons")];
    icon_dirs.extend(
        data_dirs
            .split(':')
            .filter(|d| !d.is_empty())
            .map(|d| Path::new(d).join("icons")),
    );
    icon_dirs.push(PathBuf::from(PIXMAPS_DIR));
    icon_dirs
}
