//! Terminal presentation
//!
//! Copy progress for `install` and `launch` is drawn with indicatif. The bar draws to
//! stderr and stays hidden when stderr is not a terminal.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use crate::installer::CopyProgress;

/// Longest path shown next to the bar
const MAX_MESSAGE_LEN: usize = 50;

/// Progress bar for a bundle copy
pub struct CopyProgressBar {
    bar: ProgressBar,
}

impl CopyProgressBar {
    pub fn new(bundle_name: &str) -> Self {
        let style = ProgressStyle::default_bar()
            .template("{prefix} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        bar.set_prefix(format!("Installing {bundle_name}"));
        Self { bar }
    }

    /// A bar that never draws
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl CopyProgress for CopyProgressBar {
    fn start(&mut self, total_entries: u64) {
        self.bar.set_length(total_entries);
    }

    fn entry_copied(&mut self, relative: &Path) {
        self.bar.set_message(shorten(&relative.to_string_lossy()));
        self.bar.inc(1);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }

    fn abandon(&mut self) {
        self.bar.abandon();
    }
}

fn shorten(path: &str) -> String {
    let count = path.chars().count();
    if count <= MAX_MESSAGE_LEN {
        return path.to_string();
    }
    let tail: String = path.chars().skip(count - (MAX_MESSAGE_LEN - 3)).collect();
    format!("...{tail}")
}
