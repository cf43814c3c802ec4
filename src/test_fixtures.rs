//! Test fixtures for building bundles on disk.
//!
//! ```ignore
//! use crate::test_fixtures::BundleFixture;
//!
//! let fixture = BundleFixture::new("Foo.app").name("Foo").icon("icon.png");
//! let layout = fixture.layout();
//! ```
//!
//! Each fixture owns a temp directory laid out like a small home:
//! `Downloads/<bundle>` holds the bundle, `Applications/` and `share/applications/`
//! are the install targets, and `state/prompted.json` is the prompt ledger.

#![allow(clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::installer::InstallLayout;

/// Script used as the bundle executable; exits immediately
pub const APP_RUN_SCRIPT: &str = "#!/bin/sh\nexit 0\n";

/// A bundle directory inside its own temp home
pub struct BundleFixture {
    pub temp: TempDir,
    pub path: PathBuf,
    pub descriptor_path: PathBuf,
    name: Option<String>,
    icon: Option<String>,
}

impl BundleFixture {
    /// Create `Downloads/<dir_name>` with an executable `AppRun` and a minimal descriptor
    ///
    /// # Panics
    ///
    /// Panics if the fixture cannot be written.
    #[must_use]
    pub fn new(dir_name: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("Downloads").join(dir_name);
        fs::create_dir_all(&path).expect("Failed to create bundle directory");

        let app_run = path.join("AppRun");
        fs::write(&app_run, APP_RUN_SCRIPT).expect("Failed to write AppRun");
        make_executable(&app_run);

        let stem = dir_name.strip_suffix(".app").unwrap_or(dir_name);
        let descriptor_path = path.join(format!("{stem}.desktop"));

        let fixture = Self {
            temp,
            path,
            descriptor_path,
            name: None,
            icon: None,
        };
        fixture.rewrite();
        fixture
    }

    /// Set `Name=` in the descriptor
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self.rewrite();
        self
    }

    /// Create an icon file at `rel` inside the bundle and reference it with `Icon=`
    ///
    /// # Panics
    ///
    /// Panics if the icon cannot be written.
    #[must_use]
    pub fn icon(mut self, rel: &str) -> Self {
        let icon_path = self.path.join(rel);
        if let Some(parent) = icon_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create icon directory");
        }
        fs::write(&icon_path, b"\x89PNG\r\n\x1a\n").expect("Failed to write icon");
        self.icon = Some(rel.to_string());
        self.rewrite();
        self
    }

    /// Replace the descriptor with literal text
    #[must_use]
    pub fn descriptor(self, content: &str) -> Self {
        self.write_descriptor(content);
        self
    }

    /// Replace the descriptor with literal text
    ///
    /// # Panics
    ///
    /// Panics if the descriptor cannot be written.
    pub fn write_descriptor(&self, content: &str) {
        fs::write(&self.descriptor_path, content).expect("Failed to write descriptor");
    }

    /// Create another bundle `Downloads/<dir_name>` next to this one.
    ///
    /// `body` follows the `[Desktop Entry]` header of its descriptor. Every
    /// `Exec=` program it names is created as an executable script.
    ///
    /// # Panics
    ///
    /// Panics if the bundle cannot be written.
    pub fn sibling(&self, dir_name: &str, body: &str) -> PathBuf {
        let path = self.home().join("Downloads").join(dir_name);
        fs::create_dir_all(&path).expect("Failed to create bundle directory");
        for program in body.lines().filter_map(|line| line.strip_prefix("Exec=")) {
            let program = program.split_whitespace().next().unwrap_or("AppRun");
            let script = path.join(program);
            fs::write(&script, APP_RUN_SCRIPT).expect("Failed to write executable");
            make_executable(&script);
        }
        let stem = dir_name.strip_suffix(".app").unwrap_or(dir_name);
        fs::write(
            path.join(format!("{stem}.desktop")),
            format!("[Desktop Entry]\nType=Application\n{body}"),
        )
        .expect("Failed to write descriptor");
        path
    }

    /// Root of the fake home
    pub fn home(&self) -> &Path {
        self.temp.path()
    }

    /// Install targets inside the fake home
    #[must_use]
    pub fn layout(&self) -> InstallLayout {
        InstallLayout {
            applications_dir: self.home().join("Applications"),
            entries_dir: self.home().join("share").join("applications"),
        }
    }

    /// Prompt ledger location inside the fake home
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.home().join("state").join("prompted.json")
    }

    fn rewrite(&self) {
        let mut content = String::from("[Desktop Entry]\nType=Application\nExec=AppRun\n");
        if let Some(name) = &self.name {
            content.push_str(&format!("Name={name}\n"));
        }
        if let Some(icon) = &self.icon {
            content.push_str(&format!("Icon={icon}\n"));
        }
        self.write_descriptor(&content);
    }
}

/// Set the owner/group/other execute bits
///
/// # Panics
///
/// Panics if the permissions cannot be changed.
pub fn make_executable(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .expect("Failed to set permissions");
    }
    #[cfg(not(unix))]
    let _ = path;
}
