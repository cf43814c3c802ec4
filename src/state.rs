//! Persistent first-launch prompt state
//!
//! Whether a bundle is installed is read from the file system. Whether the user has
//! already said "no" cannot be, so declined bundles are recorded in a small JSON ledger.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bundle::BundleDescriptor;
use crate::common::fs::write_atomic;
use crate::error::{Result, config};
use crate::installer::Installer;
use crate::path_utils::identity_key;

const LEDGER_MODE: u32 = 0o600;

/// Where a bundle stands with respect to the install prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    /// Not installed and the user has never answered the prompt
    NeverAsked,
    /// Not installed and the user declined installation
    Declined,
    /// Installed
    Installed,
}

impl PromptState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NeverAsked => "never-asked",
            Self::Declined => "declined",
            Self::Installed => "installed",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    declined: BTreeSet<PathBuf>,
}

/// JSON file recording bundles whose install prompt was declined
#[derive(Debug, Clone)]
pub struct PromptLedger {
    path: PathBuf,
}

impl PromptLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Whether the prompt for `bundle_path` was declined
    pub fn is_declined(&self, bundle_path: &Path) -> Result<bool> {
        Ok(self.load()?.declined.contains(&identity_key(bundle_path)))
    }

    /// Record that the user declined installing `bundle_path`
    pub fn record_declined(&self, bundle_path: &Path) -> Result<()> {
        let mut ledger = self.load()?;
        if ledger.declined.insert(identity_key(bundle_path)) {
            self.save(&ledger)?;
        }
        Ok(())
    }

    /// Forget a recorded answer; returns whether one was recorded
    pub fn forget(&self, bundle_path: &Path) -> Result<bool> {
        let mut ledger = self.load()?;
        let removed = ledger.declined.remove(&identity_key(bundle_path));
        if removed {
            self.save(&ledger)?;
        }
        Ok(removed)
    }

    /// Tri-state prompt status of a bundle
    pub fn state(&self, installer: &Installer, descriptor: &BundleDescriptor) -> Result<PromptState> {
        if installer.is_installed(descriptor) {
            return Ok(PromptState::Installed);
        }
        if self.is_declined(&descriptor.bundle_path)? {
            return Ok(PromptState::Declined);
        }
        Ok(PromptState::NeverAsked)
    }

    fn load(&self) -> Result<LedgerFile> {
        if !self.path.exists() {
            return Ok(LedgerFile::default());
        }
        let display = self.path.display().to_string();
        let content = fs::read_to_string(&self.path)
            .map_err(|e| config::state_read_failed(&display, e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(LedgerFile::default());
        }
        serde_json::from_str(&content).map_err(|e| config::state_read_failed(display, e.to_string()))
    }

    fn save(&self, ledger: &LedgerFile) -> Result<()> {
        let display = self.path.display().to_string();
        let mut content = serde_json::to_string_pretty(ledger)
            .map_err(|e| config::state_write_failed(&display, e.to_string()))?;
        content.push('\n');
        write_atomic(&self.path, content.as_bytes(), LEDGER_MODE)
            .map_err(|e| config::state_write_failed(display, e.to_string()))
    }
}
