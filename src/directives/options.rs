//! Per-project option flags
//!
//! `OPTION(<flag> "<description>" ON|OFF)` lines in the project options file. A flag is on
//! iff its first declaring line contains `ON)`; a missing file or line leaves it off.

use crate::directives::call_argument;
use crate::fs::FileSystem;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectOptions {
    flags: Vec<(String, bool)>,
}

impl ProjectOptions {
    /// Read an options file; unreadable files yield no flags.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Self {
        match fs.read_text_file(path) {
            Ok(Some(text)) => Self::parse(&text),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable options file, all flags off");
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut flags: Vec<(String, bool)> = Vec::new();
        for line in text.lines() {
            if line.trim_start().starts_with('#') {
                continue;
            }
            let Some(argument) = call_argument(line, "OPTION") else {
                continue;
            };
            let Some(name) = argument.split_whitespace().next() else {
                continue;
            };
            if flags.iter().any(|(n, _)| n == name) {
                continue;
            }
            flags.push((name.to_string(), line.contains("ON)")));
        }
        Self { flags }
    }

    /// Whether `name` is declared and on.
    pub fn flag(&self, name: &str) -> bool {
        self.flags
            .iter()
            .find(|(n, _)| n == name)
            .map_or(false, |(_, on)| *on)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
