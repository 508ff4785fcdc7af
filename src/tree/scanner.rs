//! Directory scanner
//!
//! Workspace-relative listings over a [`FileSystem`], plus project enumeration and the
//! plain recursive walk used for non-code folders and the binaries directory.

use crate::config::LayoutConfig;
use crate::directives;
use crate::error::ScanError;
use crate::fs::FileSystem;
use crate::tree::node::{Node, NodeKind, ProjectType};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Lists workspace directories relative to the workspace root.
pub struct DirectoryScanner<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
    layout: &'a LayoutConfig,
}

impl<'a> DirectoryScanner<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: &'a Path, layout: &'a LayoutConfig) -> Self {
        Self { fs, root, layout }
    }

    /// Subdirectory names of `rel`, sorted. Missing directories list empty.
    pub fn list_directories(&self, rel: &Path) -> Result<Vec<String>, ScanError> {
        let path = self.root.join(rel);
        self.fs
            .list_directories(&path)
            .map_err(|source| ScanError::Listing { path, source })
    }

    /// File names of `rel`, sorted. Missing directories list empty.
    pub fn list_files(&self, rel: &Path) -> Result<Vec<String>, ScanError> {
        let path = self.root.join(rel);
        self.fs
            .list_files(&path)
            .map_err(|source| ScanError::Listing { path, source })
    }

    pub fn exists(&self, rel: &Path) -> bool {
        self.fs.exists(&self.root.join(rel))
    }

    pub fn is_dir(&self, rel: &Path) -> bool {
        self.fs.is_dir(&self.root.join(rel))
    }

    /// Whole-file read of a workspace-relative path; `None` when absent.
    pub fn read(&self, rel: &Path) -> Result<Option<String>, ScanError> {
        let path = self.root.join(rel);
        self.fs
            .read_text_file(&path)
            .map_err(|source| ScanError::Read { path, source })
    }

    /// Root directories that may hold a project: not hidden, not reserved.
    pub fn project_directories(&self) -> Result<Vec<String>, ScanError> {
        Ok(self
            .list_directories(Path::new(""))?
            .into_iter()
            .filter(|name| self.layout.is_project_candidate(name))
            .collect())
    }

    /// Candidate directories that carry a project descriptor, in listing order.
    pub fn projects(&self) -> Result<Vec<String>, ScanError> {
        Ok(self
            .project_directories()?
            .into_iter()
            .filter(|name| self.has_descriptor(name))
            .collect())
    }

    pub fn has_descriptor(&self, project: &str) -> bool {
        self.exists(&Path::new(project).join(&self.layout.descriptor_file))
    }

    /// Build product declared by the project's descriptor.
    ///
    /// An unreadable descriptor counts as an executable.
    pub fn project_type(&self, project: &str) -> ProjectType {
        let rel = Path::new(project).join(&self.layout.descriptor_file);
        match self.read(&rel) {
            Ok(descriptor) => directives::project_type(&descriptor.unwrap_or_default()),
            Err(e) => {
                warn!(project, error = %e, "Unreadable project descriptor, assuming executable");
                ProjectType::Executable
            }
        }
    }

    /// Leaf kind for a file name, by extension.
    pub fn classify(&self, name: &str) -> NodeKind {
        if self.layout.is_header(name) {
            NodeKind::Header
        } else if self.layout.is_source(name) {
            NodeKind::Source
        } else {
            NodeKind::PlainFile
        }
    }

    /// Plain recursive walk of `rel`: a folder node per directory (depth-first, directories
    /// before files), a classified leaf per file.
    pub fn walk_plain(
        &self,
        rel: &Path,
        folder_kind: NodeKind,
    ) -> Result<Vec<Node>, ScanError> {
        let mut nodes = Vec::new();

        for dir in self.list_directories(rel)? {
            let child: PathBuf = rel.join(&dir);
            let children = self.walk_plain(&child, folder_kind)?;
            nodes.push(Node::at_path(dir, folder_kind, child).with_children(children));
        }

        for file in self.list_files(rel)? {
            let kind = self.classify(&file);
            trace!(file = %file, ?kind, "Classified file");
            nodes.push(Node::at_path(file.clone(), kind, rel.join(&file)));
        }

        Ok(nodes)
    }
}
