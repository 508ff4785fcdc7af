//! Workspace dependency declarations (`FIND_PACKAGE(<name> REQUIRED)`).

use crate::directives::call_argument;
use crate::fs::FileSystem;
use std::path::Path;
use tracing::warn;

/// Declared package names in file order, first occurrence kept.
pub fn parse_dependencies(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for line in text.lines() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let Some(name) =
            call_argument(line, "FIND_PACKAGE").and_then(|a| a.split_whitespace().next())
        else {
            continue;
        };
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Read the dependency file; missing or unreadable files declare nothing.
pub fn load_dependencies(fs: &dyn FileSystem, path: &Path) -> Vec<String> {
    match fs.read_text_file(path) {
        Ok(Some(text)) => parse_dependencies(&text),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Unreadable dependency file, no dependencies"
            );
            Vec::new()
        }
    }
}
