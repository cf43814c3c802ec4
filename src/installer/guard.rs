//! Per-bundle guard against overlapping installs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, install};
use crate::path_utils::identity_key;

/// Bundles with an install currently running in this process
#[derive(Debug, Default)]
pub struct InFlight {
    bundles: Mutex<HashSet<PathBuf>>,
}

/// Held while an install runs; releases the bundle when dropped
#[derive(Debug)]
pub struct InFlightTicket<'a> {
    owner: &'a InFlight,
    key: PathBuf,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `bundle_path`, failing if another install of it is running
    pub fn acquire(&self, bundle_path: &Path) -> Result<InFlightTicket<'_>> {
        let key = identity_key(bundle_path);
        if !self.lock().insert(key.clone()) {
            return Err(install::in_progress(bundle_path.display().to_string()));
        }
        Ok(InFlightTicket { owner: self, key })
    }

    /// Whether an install of `bundle_path` is running
    pub fn is_busy(&self, bundle_path: &Path) -> bool {
        self.lock().contains(&identity_key(bundle_path))
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        self.bundles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for InFlightTicket<'_> {
    fn drop(&mut self) {
        self.owner.lock().remove(&self.key);
    }
}
