//! Installing and launching bundles
//!
//! This module handles:
//! - Deciding whether a bundle is installed (copied bundle and desktop entry both present,
//!   with the entry generated from this bundle)
//! - Copying a bundle into the applications directory
//! - Writing the desktop entry that registers the copy with launchers
//! - Launching a bundle from its installed copy or in place

pub mod copy;
pub mod guard;
pub mod launch;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::bundle::{BUNDLE_SUFFIX, BundleDescriptor};
use crate::common::fs::write_atomic;
use crate::desktop_entry::writer::SOURCE_KEY;
use crate::desktop_entry::{DESKTOP_EXTENSION, DesktopEntry, GeneratedEntry};
use crate::error::{Result, install};
use crate::icon::IconResolver;
use crate::path_utils::identity_key;

pub use copy::{CancelToken, CopyProgress, NoProgress};
pub use guard::InFlight;
pub use launch::LaunchedProcess;

/// Mode of generated desktop entries
const ENTRY_MODE: u32 = 0o644;

/// Where installed bundles and their desktop entries go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    /// Installed bundle copies, e.g. `~/Applications`
    pub applications_dir: PathBuf,
    /// Generated desktop entries, e.g. `~/.local/share/applications`
    pub entries_dir: PathBuf,
}

/// Result of a successful install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledApp {
    pub bundle_path: PathBuf,
    pub desktop_entry_path: PathBuf,
    /// False when an existing copy was reused
    pub copied: bool,
    /// False when the bundle was already fully installed and nothing was written
    pub changed: bool,
}

/// Installs bundles into an [`InstallLayout`]
#[derive(Debug)]
pub struct Installer {
    layout: InstallLayout,
    resolver: IconResolver,
    in_flight: InFlight,
}

impl Installer {
    pub fn new(layout: InstallLayout, resolver: IconResolver) -> Self {
        Self {
            layout,
            resolver,
            in_flight: InFlight::new(),
        }
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    pub fn resolver(&self) -> &IconResolver {
        &self.resolver
    }

    /// Where the bundle copy goes: `<applications_dir>/<name>.app`
    pub fn target_bundle_path(&self, descriptor: &BundleDescriptor) -> PathBuf {
        self.layout
            .applications_dir
            .join(format!("{}{BUNDLE_SUFFIX}", descriptor.install_name()))
    }

    /// Where the desktop entry goes: `<entries_dir>/<name>.desktop`
    pub fn desktop_entry_path(&self, descriptor: &BundleDescriptor) -> PathBuf {
        self.layout
            .entries_dir
            .join(format!("{}.{DESKTOP_EXTENSION}", descriptor.install_name()))
    }

    /// Whether both the bundle copy and its desktop entry exist and belong to this bundle
    pub fn is_installed(&self, descriptor: &BundleDescriptor) -> bool {
        self.target_bundle_path(descriptor).is_dir()
            && self.desktop_entry_path(descriptor).is_file()
            && self.other_owner(descriptor).is_none()
    }

    /// A different bundle recorded as the source of the entry at this bundle's install name.
    ///
    /// Entries without a source key are not attributed to anyone, and the installed copy
    /// itself always belongs to its entry.
    pub fn other_owner(&self, descriptor: &BundleDescriptor) -> Option<PathBuf> {
        let text = fs::read_to_string(self.desktop_entry_path(descriptor)).ok()?;
        let entry = DesktopEntry::parse(&text).ok()?;
        let source = PathBuf::from(entry.get_non_empty(SOURCE_KEY)?);

        let this = identity_key(&descriptor.bundle_path);
        let owned = this == identity_key(&source)
            || this == identity_key(&self.target_bundle_path(descriptor));
        (!owned).then_some(source)
    }

    /// Whether an install of this bundle is running in this process
    pub fn is_installing(&self, descriptor: &BundleDescriptor) -> bool {
        self.in_flight.is_busy(&descriptor.bundle_path)
    }

    /// Install without progress reporting or cancellation
    #[cfg(test)]
    pub fn install(&self, descriptor: &BundleDescriptor) -> Result<InstalledApp> {
        self.install_with(descriptor, &CancelToken::new(), &mut NoProgress)
    }

    /// Install a bundle.
    ///
    /// An existing copy at the target path is reused rather than overwritten. The desktop
    /// entry is written only after the copy is complete, so a failed or cancelled copy
    /// leaves nothing registered.
    pub fn install_with(
        &self,
        descriptor: &BundleDescriptor,
        cancel: &CancelToken,
        progress: &mut dyn CopyProgress,
    ) -> Result<InstalledApp> {
        let _ticket = self.in_flight.acquire(&descriptor.bundle_path)?;

        let target = self.target_bundle_path(descriptor);
        let entry_path = self.desktop_entry_path(descriptor);

        if self.is_installed(descriptor) {
            info!(target = %target.display(), "already installed");
            return Ok(InstalledApp {
                bundle_path: target,
                desktop_entry_path: entry_path,
                copied: false,
                changed: false,
            });
        }
        if let Some(owner) = self.other_owner(descriptor) {
            return Err(install::name_taken(
                target.display().to_string(),
                owner.display().to_string(),
            ));
        }

        let copied = if target.exists() {
            info!(target = %target.display(), "bundle copy already present, skipping copy");
            false
        } else {
            info!(
                source = %descriptor.bundle_path.display(),
                target = %target.display(),
                "copying bundle"
            );
            copy::copy_bundle(&descriptor.bundle_path, &target, cancel, progress)?;
            true
        };

        let installed = descriptor.relocated(&target);
        let entry = self.generated_entry(descriptor, &installed);
        write_atomic(&entry_path, entry.render().as_bytes(), ENTRY_MODE)
            .map_err(|e| install::entry_write_failed(entry_path.display().to_string(), e.to_string()))?;
        info!(entry = %entry_path.display(), "desktop entry written");

        if let Err(e) = launch::ensure_executable(&installed.executable_path()) {
            warn!(
                executable = %installed.executable_path().display(),
                error = %e,
                "could not mark installed executable as executable"
            );
        }

        Ok(InstalledApp {
            bundle_path: target,
            desktop_entry_path: entry_path,
            copied,
            changed: true,
        })
    }

    /// Desktop entry for the copy at `installed`, generated from the original `descriptor`
    fn generated_entry(
        &self,
        descriptor: &BundleDescriptor,
        installed: &BundleDescriptor,
    ) -> GeneratedEntry {
        let executable = installed.executable_path();
        let mut exec = vec![executable.to_string_lossy().into_owned()];
        exec.extend(installed.exec_args.iter().cloned());

        GeneratedEntry {
            name: descriptor.display_name.clone(),
            comment: descriptor.comment.clone(),
            exec,
            working_dir: executable.parent().map(Path::to_path_buf),
            icon: self.resolver.resolve(installed).desktop_value(),
            terminal: descriptor.terminal,
            categories: descriptor.categories.clone(),
            startup_notify: descriptor.startup_notify,
            source: Some(identity_key(&descriptor.bundle_path)),
        }
    }

    /// Executable to run: the installed copy's if installed, otherwise the original's
    pub fn launch_target(&self, descriptor: &BundleDescriptor) -> PathBuf {
        if self.is_installed(descriptor) {
            descriptor.executable_path_in(&self.target_bundle_path(descriptor))
        } else {
            descriptor.executable_path()
        }
    }

    /// Start the bundle's executable as a detached process
    pub fn launch(&self, descriptor: &BundleDescriptor) -> Result<LaunchedProcess> {
        launch::spawn_detached(&self.launch_target(descriptor), &descriptor.exec_args)
    }
}
