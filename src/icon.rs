//! Icon resolution for bundles
//!
//! An icon reference from a descriptor is resolved in a fixed order:
//! 1. an absolute path to an existing image
//! 2. an image inside the bundle, relative to its root
//! 3. a name found in the configured icon theme directories
//! 4. the generic application icon
//!
//! Resolution only reads the file system. Theme lookups are cached per resolver.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;
use url::Url;
use walkdir::WalkDir;

use crate::bundle::BundleDescriptor;

/// Icon name used when nothing better is found
pub const GENERIC_ICON: &str = "application-x-executable";

/// Extensions accepted for icons given as file paths
const IMAGE_EXTENSIONS: &[&str] = &["png", "svg", "svgz", "xpm", "jpg", "jpeg", "ico", "bmp", "webp"];

/// Extensions looked up in icon themes
const THEME_EXTENSIONS: &[&str] = &["png", "svg", "xpm"];

/// `<theme>/<size>/<context>/<icon>` is four levels below a search directory
const THEME_SEARCH_DEPTH: usize = 4;

/// A displayable icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconHandle {
    /// An image file
    File(PathBuf),
    /// A name resolved through the icon theme
    Themed(String),
    /// The generic application icon
    Generic,
}

impl IconHandle {
    /// Value for the `Icon=` key of a desktop entry; never empty
    pub fn desktop_value(&self) -> String {
        match self {
            Self::File(path) => path.to_string_lossy().into_owned(),
            Self::Themed(name) => name.clone(),
            Self::Generic => GENERIC_ICON.to_string(),
        }
    }

    /// Percent-encoded `file://` URI for file managers' custom-icon metadata, for file icons only
    pub fn custom_icon_uri(&self) -> Option<String> {
        match self {
            Self::File(path) => Url::from_file_path(path).ok().map(String::from),
            Self::Themed(_) | Self::Generic => None,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Self::Generic)
    }
}

impl fmt::Display for IconHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Themed(name) => write!(f, "theme icon {name}"),
            Self::Generic => write!(f, "generic icon {GENERIC_ICON}"),
        }
    }
}

/// Resolves icon references; owns the theme lookup cache
#[derive(Debug)]
pub struct IconResolver {
    search_dirs: Vec<PathBuf>,
    theme: Option<String>,
    theme_cache: Mutex<HashMap<String, Option<PathBuf>>>,
}

impl IconResolver {
    /// Create a resolver searching `search_dirs` for themed icons, preferring `theme`
    pub fn new(search_dirs: Vec<PathBuf>, theme: Option<String>) -> Self {
        Self {
            search_dirs,
            theme,
            theme_cache: Mutex::new(HashMap::new()),
        }
    }

    /// A resolver that never finds themed icons
    #[cfg(test)]
    pub fn without_themes() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Resolve the icon of a bundle
    pub fn resolve(&self, descriptor: &BundleDescriptor) -> IconHandle {
        self.resolve_for(&descriptor.bundle_path, descriptor.icon_ref.as_deref())
    }

    /// Resolve `icon_ref` for a bundle rooted at `bundle_root`
    pub fn resolve_for(&self, bundle_root: &Path, icon_ref: Option<&str>) -> IconHandle {
        let Some(icon_ref) = icon_ref.map(str::trim).filter(|r| !r.is_empty()) else {
            return IconHandle::Generic;
        };

        let as_path = Path::new(icon_ref);
        if as_path.is_absolute() {
            if is_image_file(as_path) {
                return IconHandle::File(as_path.to_path_buf());
            }
        } else if let Some(found) = find_in_bundle(bundle_root, as_path) {
            return IconHandle::File(found);
        }

        if is_theme_name(icon_ref) && self.theme_lookup(icon_ref).is_some() {
            return IconHandle::Themed(icon_ref.to_string());
        }

        debug!(icon = icon_ref, bundle = %bundle_root.display(), "falling back to generic icon");
        IconHandle::Generic
    }

    /// Path of the themed icon `name`, if any search directory has it
    pub fn theme_lookup(&self, name: &str) -> Option<PathBuf> {
        let mut cache = self
            .theme_cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(cached) = cache.get(name) {
            return cached.clone();
        }

        let found = self.search_theme_dirs(name);
        cache.insert(name.to_string(), found.clone());
        found
    }

    fn search_theme_dirs(&self, name: &str) -> Option<PathBuf> {
        let mut roots = Vec::new();
        for dir in &self.search_dirs {
            if let Some(theme) = &self.theme {
                roots.push(dir.join(theme));
            }
            roots.push(dir.join("hicolor"));
            roots.push(dir.clone());
        }

        roots
            .iter()
            .filter(|root| root.is_dir())
            .find_map(|root| find_named_icon(root, name))
    }
}

fn find_in_bundle(bundle_root: &Path, rel: &Path) -> Option<PathBuf> {
    let candidate = bundle_root.join(rel);
    if is_image_file(&candidate) {
        return Some(candidate);
    }
    if rel.extension().is_some() {
        return None;
    }
    THEME_EXTENSIONS
        .iter()
        .map(|ext| candidate.with_extension(ext))
        .find(|p| p.is_file())
}

fn find_named_icon(root: &Path, name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .max_depth(THEME_SEARCH_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .find(|path| {
            path.file_stem().is_some_and(|stem| stem == name) && has_extension(path, THEME_EXTENSIONS)
        })
}

fn is_theme_name(icon_ref: &str) -> bool {
    !icon_ref.contains('/') && !icon_ref.contains('\\')
}

fn is_image_file(path: &Path) -> bool {
    path.is_file() && has_extension(path, IMAGE_EXTENSIONS)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}
