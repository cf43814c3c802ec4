//! Optional YAML configuration file (`config.yaml`)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, config};

/// What to do when a user who declined installation launches the bundle again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclinePolicy {
    /// Launch in place without asking again
    #[default]
    Remember,
    /// Ask again on every launch until installed
    Reprompt,
}

/// Contents of the configuration file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub applications_dir: Option<String>,
    pub entries_dir: Option<String>,
    pub state_file: Option<String>,
    pub decline_policy: Option<DeclinePolicy>,
    pub icon_dirs: Option<Vec<String>>,
    pub icon_theme: Option<String>,
}

impl ConfigFile {
    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| config::read_failed(&display, e.to_string()))?;
        Self::from_yaml(&yaml).map_err(|e| config::parse_failed(display, e.to_string()))
    }
}
