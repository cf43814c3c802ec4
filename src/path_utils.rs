//! Path utilities for bundle names and user-supplied paths

use std::path::{Path, PathBuf};

/// Characters that are unsafe in a single path component
/// Replaced with hyphens: `/`, `\`, `:`, `*`, `?`, `"`, `<`, `>`, `|`
const PATH_UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make an application name safe to use as a single file name.
///
/// Replaces unsafe characters and control characters with hyphens, collapses runs of
/// replaced characters, and strips leading dots so the result is never a hidden file.
/// Spaces are kept. Returns `None` if nothing usable remains.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(make_path_safe("My App"), Some("My App".to_string()));
/// assert_eq!(make_path_safe("AC/DC Player"), Some("AC-DC Player".to_string()));
/// assert_eq!(make_path_safe("..."), None);
/// ```
pub fn make_path_safe(name: &str) -> Option<String> {
    let mut safe = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if PATH_UNSAFE_CHARS.contains(&c) || c.is_control() {
            if !safe.ends_with('-') {
                safe.push('-');
            }
        } else {
            safe.push(c);
        }
    }

    let safe = safe.trim_start_matches('.').trim_matches('-').trim();
    if safe.is_empty() {
        None
    } else {
        Some(safe.to_string())
    }
}

/// Expand a leading `~/` (or a lone `~`) to the user's home directory.
///
/// Paths without a tilde, and tildes when no home directory is known, are returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

/// Canonical form of a path used as an identity key, falling back to the path as given
pub fn identity_key(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
