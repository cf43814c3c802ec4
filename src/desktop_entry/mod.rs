//! Desktop entry key/value files
//!
//! Reads the `[Desktop Entry]` group of a `.desktop` file tolerantly and renders the
//! entries generated at install time. Only the keys this tool needs are interpreted;
//! everything else is kept in the parsed map and otherwise ignored.

pub mod exec;
pub mod writer;

pub use writer::GeneratedEntry;

/// The only group whose keys are read
pub const DESKTOP_ENTRY_GROUP: &str = "Desktop Entry";

/// File extension for descriptor and generated entry files
pub const DESKTOP_EXTENSION: &str = "desktop";

/// Parsed main group of a desktop entry file, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    entries: Vec<(String, String)>,
}

impl DesktopEntry {
    /// Parse desktop entry text.
    ///
    /// Blank lines and `#` comments are skipped. Keys that appear before any group header
    /// are treated as part of the main group, so bare `key=value` files are accepted.
    /// When a key repeats, the first value wins. Returns a human-readable reason on failure.
    pub fn parse(content: &str) -> Result<Self, String> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut in_main_group = true;
        let mut saw_group = false;
        let mut saw_main_group = false;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') {
                let name = line
                    .strip_prefix('[')
                    .and_then(|l| l.strip_suffix(']'))
                    .ok_or_else(|| format!("line {line_no}: malformed group header '{line}'"))?;
                saw_group = true;
                in_main_group = name == DESKTOP_ENTRY_GROUP;
                saw_main_group |= in_main_group;
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| format!("line {line_no}: expected key=value, found '{line}'"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(format!("line {line_no}: missing key before '='"));
            }

            if in_main_group && !entries.iter().any(|(k, _)| k == key) {
                entries.push((key.to_string(), unescape_value(value.trim_start())));
            }
        }

        if saw_group && !saw_main_group {
            return Err(format!("missing [{DESKTOP_ENTRY_GROUP}] group"));
        }

        Ok(Self { entries })
    }

    /// Value of `key` with escape sequences already decoded
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of `key` if present and not blank
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Boolean value of `key`; anything other than `true`/`false` yields `default`
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get_non_empty(key) {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }
}

/// Decode the string escapes of the desktop entry format: `\s`, `\n`, `\t`, `\r`, `\\`.
///
/// Unknown escapes are kept verbatim.
pub fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Encode a string value for writing; the inverse of [`unescape_value`]
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_main_group() {
        let entry = DesktopEntry::parse(
            "# comment\n[Desktop Entry]\nName=Foo\nExec=AppRun\nIcon=icon.png\n",
        )
        .unwrap();

        assert_eq!(entry.get("Name"), Some("Foo"));
        assert_eq!(entry.get("Exec"), Some("AppRun"));
        assert_eq!(entry.get("Icon"), Some("icon.png"));
        assert_eq!(entry.get("Type"), None);
    }

    #[test]
    fn test_parse_bare_key_values() {
        let entry = DesktopEntry::parse("Exec=run.sh\nName = Bare\n").unwrap();
        assert_eq!(entry.get("Exec"), Some("run.sh"));
        assert_eq!(entry.get("Name"), Some("Bare"));
    }

    #[test]
    fn test_parse_ignores_other_groups_and_unknown_keys() {
        let entry = DesktopEntry::parse(
            "[Desktop Entry]\nExec=a\nX-Custom=1\nName[fr]=Le Foo\n\
             [Desktop Action New]\nExec=b --new\n",
        )
        .unwrap();

        assert_eq!(entry.get("Exec"), Some("a"));
        assert_eq!(entry.get("X-Custom"), Some("1"));
        assert_eq!(entry.get("Name"), None);
    }

    #[test]
    fn test_parse_first_duplicate_wins() {
        let entry = DesktopEntry::parse("[Desktop Entry]\nExec=first\nExec=second\n").unwrap();
        assert_eq!(entry.get("Exec"), Some("first"));
    }

    #[test]
    fn test_parse_strips_bom_and_crlf() {
        let entry = DesktopEntry::parse("\u{feff}[Desktop Entry]\r\nExec=AppRun\r\n").unwrap();
        assert_eq!(entry.get("Exec"), Some("AppRun"));
    }

    #[test]
    fn test_parse_rejects_garbage_line() {
        let err = DesktopEntry::parse("[Desktop Entry]\nthis is not a pair\n").unwrap_err();
        assert!(err.contains("line 2"), "{err}");
    }

    #[test]
    fn test_parse_rejects_missing_main_group() {
        let err = DesktopEntry::parse("[Something Else]\nExec=a\n").unwrap_err();
        assert!(err.contains("Desktop Entry"), "{err}");
    }

    #[test]
    fn test_parse_rejects_unterminated_header() {
        assert!(DesktopEntry::parse("[Desktop Entry\nExec=a\n").is_err());
    }

    #[test]
    fn test_get_bool() {
        let entry = DesktopEntry::parse("Terminal=true\nStartupNotify=maybe\n").unwrap();
        assert!(entry.get_bool("Terminal", false));
        assert!(entry.get_bool("StartupNotify", true));
        assert!(!entry.get_bool("Missing", false));
    }

    #[test]
    fn test_value_escapes() {
        assert_eq!(unescape_value(r"a\sb\nc\\d\q"), "a b\nc\\d\\q");
        let raw = "C:\\dir\nline";
        assert_eq!(unescape_value(&escape_value(raw)), raw);
    }
}
