//! Bundle descriptor reader
//!
//! A bundle is a directory whose name ends in `.app` and which contains a `.desktop`
//! descriptor directly inside it. The descriptor names the executable, and optionally an
//! icon and a display name. Directories that do not match are ordinary folders, which is
//! a normal negative answer rather than an error.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::desktop_entry::{DESKTOP_EXTENSION, DesktopEntry, exec};
use crate::error::{Result, descriptor};
use crate::path_utils;

/// Directory name suffix that marks a bundle
pub const BUNDLE_SUFFIX: &str = ".app";

const DEFAULT_CATEGORIES: &str = "Application;";

/// Result of looking at a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Not a bundle; treat as an ordinary folder
    NotABundle,
    /// A recognized bundle
    Bundle(BundleDescriptor),
}

impl Detection {
    pub fn into_descriptor(self) -> Option<BundleDescriptor> {
        match self {
            Self::Bundle(d) => Some(d),
            Self::NotABundle => None,
        }
    }
}

/// What a bundle's descriptor says about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDescriptor {
    /// The bundle directory
    pub bundle_path: PathBuf,
    /// The `.desktop` file the fields were read from
    pub descriptor_path: PathBuf,
    /// Program as written in `Exec`, relative to the bundle or absolute
    pub executable_ref: String,
    /// Arguments from `Exec`, field codes removed
    pub exec_args: Vec<String>,
    pub icon_ref: Option<String>,
    pub display_name: String,
    pub comment: Option<String>,
    pub terminal: bool,
    pub categories: String,
    pub startup_notify: bool,
}

/// Whether a path name carries the bundle suffix
pub fn has_bundle_suffix(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() > BUNDLE_SUFFIX.len() && n.ends_with(BUNDLE_SUFFIX))
}

/// Whether `path` is a bundle, without reading its descriptor
pub fn is_bundle(path: &Path) -> bool {
    has_bundle_suffix(path) && path.is_dir() && matches!(find_descriptor(path), Ok(Some(_)))
}

/// Locate the descriptor inside a bundle directory.
///
/// The descriptor is the first `.desktop` file (by name) directly inside the directory.
pub fn find_descriptor(bundle_path: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(bundle_path)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == DESKTOP_EXTENSION) && p.is_file())
        .collect();
    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Look at a directory and read its descriptor if it is a bundle.
///
/// Returns [`Detection::NotABundle`] for anything that is not a directory with the bundle
/// suffix and a descriptor. A descriptor that exists but cannot be read or parsed is a
/// [`crate::error::AppBundleError::DescriptorParse`] error.
pub fn detect(path: &Path) -> Result<Detection> {
    if !has_bundle_suffix(path) || !path.is_dir() {
        return Ok(Detection::NotABundle);
    }

    let descriptor_path = find_descriptor(path)
        .map_err(|e| descriptor::parse_failed(path.display().to_string(), e.to_string()))?;
    let Some(descriptor_path) = descriptor_path else {
        debug!(bundle = %path.display(), "no descriptor found");
        return Ok(Detection::NotABundle);
    };

    BundleDescriptor::read(path, &descriptor_path).map(Detection::Bundle)
}

impl BundleDescriptor {
    /// Read and parse the descriptor of `bundle_path`
    pub fn read(bundle_path: &Path, descriptor_path: &Path) -> Result<Self> {
        let parse_error =
            |reason: String| descriptor::parse_failed(descriptor_path.display().to_string(), reason);

        let bytes = fs::read(descriptor_path).map_err(|e| parse_error(e.to_string()))?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    descriptor = %descriptor_path.display(),
                    "descriptor is not valid UTF-8, decoding lossily"
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        let entry = DesktopEntry::parse(&content).map_err(parse_error)?;
        Self::from_entry(bundle_path, descriptor_path, &entry).map_err(parse_error)
    }

    fn from_entry(
        bundle_path: &Path,
        descriptor_path: &Path,
        entry: &DesktopEntry,
    ) -> std::result::Result<Self, String> {
        let exec_value = entry
            .get_non_empty("Exec")
            .ok_or_else(|| "missing required key Exec".to_string())?;
        if exec_value.contains(char::REPLACEMENT_CHARACTER) {
            return Err("Exec is not valid UTF-8".to_string());
        }

        let mut words = exec::split(exec_value)?.into_iter();
        let executable_ref = words
            .next()
            .filter(|w| !w.is_empty())
            .ok_or_else(|| "Exec names no program".to_string())?;
        let exec_args = exec::strip_field_codes(&words.collect::<Vec<_>>());

        let display_name = entry
            .get_non_empty("Name")
            .map_or_else(|| bundle_stem(bundle_path), ToString::to_string);

        Ok(Self {
            bundle_path: bundle_path.to_path_buf(),
            descriptor_path: descriptor_path.to_path_buf(),
            executable_ref,
            exec_args,
            icon_ref: entry.get_non_empty("Icon").map(ToString::to_string),
            display_name,
            comment: entry.get_non_empty("Comment").map(ToString::to_string),
            terminal: entry.get_bool("Terminal", false),
            categories: entry
                .get_non_empty("Categories")
                .unwrap_or(DEFAULT_CATEGORIES)
                .to_string(),
            startup_notify: entry.get_bool("StartupNotify", true),
        })
    }

    /// Absolute path of the executable inside this bundle
    pub fn executable_path(&self) -> PathBuf {
        self.executable_path_in(&self.bundle_path)
    }

    /// Path of the executable when the bundle lives at `root` instead.
    ///
    /// Relative references and absolute ones pointing into the original bundle are
    /// rebased onto `root`; absolute references elsewhere are returned unchanged.
    pub fn executable_path_in(&self, root: &Path) -> PathBuf {
        let exec = Path::new(&self.executable_ref);
        if exec.is_absolute() {
            match exec.strip_prefix(&self.bundle_path) {
                Ok(rel) => root.join(rel),
                Err(_) => exec.to_path_buf(),
            }
        } else {
            root.join(exec)
        }
    }

    /// The same descriptor as seen from a copy of the bundle at `root`
    pub fn relocated(&self, root: &Path) -> Self {
        let descriptor_path = self
            .descriptor_path
            .strip_prefix(&self.bundle_path)
            .map_or_else(|_| self.descriptor_path.clone(), |rel| root.join(rel));
        let executable_ref = self.executable_path_in(root).to_string_lossy().into_owned();
        let icon_ref = self.icon_ref.as_ref().map(|icon| {
            Path::new(icon)
                .strip_prefix(&self.bundle_path)
                .map_or_else(|_| icon.clone(), |rel| root.join(rel).to_string_lossy().into_owned())
        });

        Self {
            bundle_path: root.to_path_buf(),
            descriptor_path,
            executable_ref,
            icon_ref,
            ..self.clone()
        }
    }

    /// File-system-safe name used for the installed bundle and its desktop entry
    pub fn install_name(&self) -> String {
        path_utils::make_path_safe(&self.display_name)
            .or_else(|| path_utils::make_path_safe(&bundle_stem(&self.bundle_path)))
            .unwrap_or_else(|| "Application".to_string())
    }
}

/// Folder name without the bundle suffix
fn bundle_stem(bundle_path: &Path) -> String {
    let name = bundle_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(BUNDLE_SUFFIX).unwrap_or(&name).to_string()
}
