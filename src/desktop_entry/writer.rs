//! Rendering of the desktop entries generated at install time

use std::fmt::Write as _;
use std::path::PathBuf;

use super::{DESKTOP_ENTRY_GROUP, escape_value, exec};

/// Key recording which bundle an installed entry was generated from
pub const SOURCE_KEY: &str = "X-AppBundle-Source";

/// A launcher entry pointing at an installed bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEntry {
    pub name: String,
    pub comment: Option<String>,
    /// Absolute program path followed by its arguments
    pub exec: Vec<String>,
    /// Working directory for the launched program
    pub working_dir: Option<PathBuf>,
    pub icon: String,
    pub terminal: bool,
    pub categories: String,
    pub startup_notify: bool,
    pub source: Option<PathBuf>,
}

impl GeneratedEntry {
    /// Render the entry as desktop entry text
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[{DESKTOP_ENTRY_GROUP}]");
        let _ = writeln!(out, "Type=Application");
        let _ = writeln!(out, "Name={}", escape_value(&self.name));
        if let Some(comment) = &self.comment {
            let _ = writeln!(out, "Comment={}", escape_value(comment));
        }
        let _ = writeln!(out, "Exec={}", escape_value(&exec::join(&self.exec)));
        if let Some(dir) = &self.working_dir {
            let _ = writeln!(out, "Path={}", escape_value(&dir.to_string_lossy()));
        }
        let _ = writeln!(out, "Icon={}", escape_value(&self.icon));
        let _ = writeln!(out, "Terminal={}", self.terminal);
        let _ = writeln!(out, "Categories={}", escape_value(&self.categories));
        let _ = writeln!(out, "StartupNotify={}", self.startup_notify);
        if let Some(source) = &self.source {
            let _ = writeln!(out, "{SOURCE_KEY}={}", escape_value(&source.to_string_lossy()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop_entry::DesktopEntry;

    fn sample() -> GeneratedEntry {
        GeneratedEntry {
            name: "Foo".to_string(),
            comment: None,
            exec: vec!["/home/me/Applications/Foo.app/AppRun".to_string()],
            working_dir: Some(PathBuf::from("/home/me/Applications/Foo.app")),
            icon: "/home/me/Applications/Foo.app/icon.png".to_string(),
            terminal: false,
            categories: "Application;".to_string(),
            startup_notify: true,
            source: Some(PathBuf::from("/home/me/Downloads/Foo.app")),
        }
    }

    #[test]
    fn test_render_required_keys() {
        let text = sample().render();
        assert!(text.starts_with("[Desktop Entry]\n"));
        assert!(text.contains("Type=Application\n"));
        assert!(text.contains("Name=Foo\n"));
        assert!(text.contains("Exec=/home/me/Applications/Foo.app/AppRun\n"));
        assert!(text.contains("Icon=/home/me/Applications/Foo.app/icon.png\n"));
        assert!(!text.contains("Comment="));
    }

    #[test]
    fn test_render_parses_back() {
        let mut entry = sample();
        entry.name = "My App".to_string();
        entry.comment = Some("Two\nlines".to_string());
        entry.exec = vec![
            "/home/me/Applications/My App.app/run".to_string(),
            "--mode=a b".to_string(),
        ];

        let parsed = DesktopEntry::parse(&entry.render()).unwrap();
        assert_eq!(parsed.get("Name"), Some("My App"));
        assert_eq!(parsed.get("Comment"), Some("Two\nlines"));
        assert_eq!(
            exec::split(parsed.get("Exec").unwrap()).unwrap(),
            entry.exec
        );
        assert_eq!(parsed.get(SOURCE_KEY), Some("/home/me/Downloads/Foo.app"));
    }
}
