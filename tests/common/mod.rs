//! Common test utilities for appbundle integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Executable used by test bundles; exits immediately
pub const APP_RUN: &str = "#!/bin/sh\nexit 0\n";

/// A fake home with its own applications, entries and state locations
pub struct TestEnv {
    pub temp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let env = Self {
            temp: TempDir::new().expect("Failed to create temp directory"),
        };
        env.write_config("icon_dirs: []\n");
        env
    }

    pub fn home(&self) -> &Path {
        self.temp.path()
    }

    pub fn applications_dir(&self) -> PathBuf {
        self.home().join("Applications")
    }

    pub fn entries_dir(&self) -> PathBuf {
        self.home().join(".local/share/applications")
    }

    pub fn state_file(&self) -> PathBuf {
        self.home().join(".config/appbundle/prompted.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.home().join("appbundle.yaml")
    }

    /// Replace the configuration file
    pub fn write_config(&self, yaml: &str) {
        fs::write(self.config_file(), yaml).expect("Failed to write config");
    }

    /// The appbundle binary, pointed at this environment
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_appbundle"));
        cmd.env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.home().join(".config"))
            .env("XDG_DATA_HOME", self.home().join(".local/share"))
            .env("APPBUNDLE_CONFIG", self.config_file())
            .env("APPBUNDLE_APPLICATIONS_DIR", self.applications_dir())
            .env("APPBUNDLE_ENTRIES_DIR", self.entries_dir())
            .env("APPBUNDLE_STATE_FILE", self.state_file())
            .env_remove("APPBUNDLE_LOG");
        cmd
    }

    /// Create `Downloads/<dir_name>` with an executable `AppRun` and a descriptor
    pub fn create_bundle(&self, dir_name: &str, descriptor: &str) -> PathBuf {
        let bundle = self.home().join("Downloads").join(dir_name);
        fs::create_dir_all(&bundle).expect("Failed to create bundle directory");

        let app_run = bundle.join("AppRun");
        fs::write(&app_run, APP_RUN).expect("Failed to write AppRun");
        make_executable(&app_run);

        let stem = dir_name.strip_suffix(".app").unwrap_or(dir_name);
        fs::write(bundle.join(format!("{stem}.desktop")), descriptor)
            .expect("Failed to write descriptor");
        bundle
    }

    /// A bundle named `name` with an icon at `icon.png`
    pub fn create_app(&self, name: &str) -> PathBuf {
        let bundle = self.create_bundle(
            &format!("{name}.app"),
            &format!(
                "[Desktop Entry]\nType=Application\nName={name}\nExec=AppRun --flag %U\nIcon=icon.png\n"
            ),
        );
        fs::write(bundle.join("icon.png"), b"\x89PNG\r\n\x1a\n").expect("Failed to write icon");
        bundle
    }

    /// Write a file relative to the home
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.home().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn read_file(&self, path: &Path) -> String {
        fs::read_to_string(path).expect("Failed to read file")
    }
}

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
