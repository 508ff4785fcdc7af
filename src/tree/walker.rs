//! Recursive file walker for derived-file listings
//!
//! Collects every file below a directory whose extension matches, as paths relative to the
//! walk root. Used for the umbrella header and the per-project source list.

use crate::error::ScanError;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};

/// Extension-filtered recursive walker over a [`FileSystem`].
pub struct Walker<'a> {
    fs: &'a dyn FileSystem,
    root: PathBuf,
    /// Directory names never descended into
    ignore_names: &'a [String],
}

impl<'a> Walker<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: PathBuf, ignore_names: &'a [String]) -> Self {
        Self {
            fs,
            root,
            ignore_names,
        }
    }

    /// Relative paths of all files with one of `extensions`.
    ///
    /// Returns paths sorted for determinism.
    pub fn collect(&self, extensions: &[String]) -> Result<Vec<PathBuf>, ScanError> {
        let mut found = Vec::new();
        self.visit(Path::new(""), extensions, &mut found)?;
        found.sort();
        Ok(found)
    }

    fn visit(
        &self,
        rel: &Path,
        extensions: &[String],
        found: &mut Vec<PathBuf>,
    ) -> Result<(), ScanError> {
        let dir = self.root.join(rel);

        let files = self
            .fs
            .list_files(&dir)
            .map_err(|source| ScanError::Listing {
                path: dir.clone(),
                source,
            })?;
        for file in files {
            let matches = Path::new(&file)
                .extension()
                .map(|ext| extensions.iter().any(|e| ext == e.as_str()))
                .unwrap_or(false);
            if matches {
                found.push(rel.join(file));
            }
        }

        let dirs = self
            .fs
            .list_directories(&dir)
            .map_err(|source| ScanError::Listing {
                path: dir.clone(),
                source,
            })?;
        for sub in dirs {
            if self.should_ignore(&sub) {
                continue;
            }
            self.visit(&rel.join(&sub), extensions, found)?;
        }
        Ok(())
    }

    fn should_ignore(&self, name: &str) -> bool {
        self.ignore_names.iter().any(|p| p == name)
    }
}

/// Render a relative path with `/` separators, as written into generated files.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
