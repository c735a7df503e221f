//! Append-only change log.
//!
//! Each mutating command records one timestamped line so edits to the sheets
//! can be traced later. Failing to write the log never fails the command.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

/// Default log file, relative to the working directory
pub const DEFAULT_CHANGELOG: &str = "log.txt";

#[derive(Debug, Clone)]
pub struct ChangeLog {
    path: Option<PathBuf>,
}

impl ChangeLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A change log that discards every entry
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Formats one log line: `[<timestamp>] <message>`
    pub fn format_entry(timestamp: &str, message: &str) -> String {
        format!("[{timestamp}] {message}")
    }

    /// Appends `message` with the current local time.
    pub fn record(&self, message: &str) {
        let Some(path) = &self.path else {
            return;
        };

        let timestamp = Local::now().format("%a %b %e %H:%M:%S %Y").to_string();
        let line = Self::format_entry(&timestamp, message);

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{line}"));

        if let Err(e) = result {
            log::warn!("Could not write change log {}: {}", path.display(), e);
        }
    }
}

impl Default for ChangeLog {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGELOG)
    }
}
