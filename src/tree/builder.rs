//! Tree builder
//!
//! Produces a fresh, disconnected snapshot of the whole workspace on each refresh. The
//! builder only reads; merging into the displayed tree is the reconciler's job.

use crate::config::ExplorerConfig;
use crate::directives::{load_dependencies, ProjectOptions, ProjectRegistry};
use crate::error::ScanError;
use crate::fs::FileSystem;
use crate::tree::node::{Node, NodeKind, NodeLocation};
use crate::tree::pairing::{pair, ExtensionRule};
use crate::tree::scanner::DirectoryScanner;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

pub const LIBRARIES_LABEL: &str = "Libraries";
pub const STANDARD_LIBRARY_LABEL: &str = "Standard Library";
pub const DEPENDENCIES_LABEL: &str = "Dependencies";
pub const TESTS_LABEL: &str = "Tests";
pub const BINARIES_LABEL: &str = "Binaries";
pub const LICENSE_FILE: &str = "LICENSE";

/// One build's output: the workspace root, the optional binaries root, and the projects
/// the root enumeration found.
#[derive(Debug)]
pub struct WorkspaceSnapshot {
    pub root: Node,
    pub binaries: Option<Node>,
    pub projects: Vec<String>,
}

/// Builds [`WorkspaceSnapshot`]s from the filesystem.
pub struct TreeBuilder<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
    config: &'a ExplorerConfig,
    workspace_name: String,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: &'a Path, config: &'a ExplorerConfig) -> Self {
        Self {
            fs,
            root,
            config,
            workspace_name: config.resolve_workspace_name(root),
        }
    }

    pub fn workspace_name(&self) -> &str {
        &self.workspace_name
    }

    fn scanner(&self) -> DirectoryScanner<'_> {
        DirectoryScanner::new(self.fs, self.root, &self.config.layout)
    }

    /// Build the complete workspace snapshot.
    #[instrument(skip(self), fields(workspace = %self.workspace_name))]
    pub fn build(&self) -> Result<WorkspaceSnapshot, ScanError> {
        let start = Instant::now();
        let scanner = self.scanner();
        let layout = &self.config.layout;

        let registry = ProjectRegistry::new(self.fs, self.root.join(&layout.projects_file));
        let suppressed: HashSet<String> = registry.suppressed();
        let projects = scanner.projects()?;

        let mut children = Vec::with_capacity(projects.len() + 1);
        children.push(self.build_libraries());
        for project in &projects {
            let loaded = !suppressed.contains(project);
            children.push(self.build_project(&scanner, project, loaded)?);
        }

        let root = Node::at_path(
            self.workspace_name.clone(),
            NodeKind::Workspace,
            PathBuf::new(),
        )
        .with_children(children);

        let bin = Path::new(&layout.bin_dir);
        let binaries = if scanner.is_dir(bin) {
            let contents = scanner.walk_plain(bin, NodeKind::Folder)?;
            Some(
                Node::at_path(BINARIES_LABEL, NodeKind::BinariesGroup, bin)
                    .with_children(contents),
            )
        } else {
            None
        };

        info!(
            projects = projects.len(),
            unloaded = projects.iter().filter(|p| suppressed.contains(*p)).count(),
            nodes = root.count(),
            binaries = binaries.is_some(),
            duration_ms = start.elapsed().as_millis(),
            "Tree build completed"
        );

        Ok(WorkspaceSnapshot {
            root,
            binaries,
            projects,
        })
    }

    /// Libraries group: the standard library, then each declared dependency.
    pub fn build_libraries(&self) -> Node {
        let path = self.root.join(&self.config.layout.dependencies_file);
        let refs = std::iter::once(STANDARD_LIBRARY_LABEL.to_string())
            .chain(load_dependencies(self.fs, &path))
            .map(|name| Node::virtual_node(name, NodeKind::LibraryRef))
            .collect();
        Node::virtual_node(LIBRARIES_LABEL, NodeKind::LibraryGroup).with_children(refs)
    }

    fn build_project(
        &self,
        scanner: &DirectoryScanner<'_>,
        project: &str,
        loaded: bool,
    ) -> Result<Node, ScanError> {
        let layout = &self.config.layout;
        let project_dir = Path::new(project);
        let project_type = scanner.project_type(project);

        if !loaded {
            debug!(project, %project_type, "Project unloaded");
            return Ok(Node::at_path(
                project,
                NodeKind::UnloadedProject(project_type),
                project_dir,
            ));
        }

        let options_path = self.root.join(project_dir).join(&layout.options_file);
        let options = ProjectOptions::load(self.fs, &options_path);
        let tests_enabled = options.flag(&self.config.options.testing_visible);

        let mut children = vec![
            Node::virtual_node(DEPENDENCIES_LABEL, NodeKind::Dependencies),
            Node::virtual_node(TESTS_LABEL, NodeKind::Tests { enabled: tests_enabled }),
        ];

        for dir in scanner.list_directories(project_dir)? {
            if dir == layout.include_dir || dir == layout.src_dir {
                continue;
            }
            let rel = project_dir.join(&dir);
            let contents = scanner.walk_plain(&rel, NodeKind::NonCodeFolder)?;
            children.push(Node::at_path(dir, NodeKind::NonCodeFolder, rel).with_children(contents));
        }

        children.extend(self.build_code_tree(
            scanner,
            &project_dir.join(&layout.include_dir),
            &project_dir.join(&layout.src_dir),
        )?);

        for file in scanner.list_files(project_dir)? {
            if layout.is_build_file(&file) {
                continue;
            }
            let kind = if file.eq_ignore_ascii_case(LICENSE_FILE) {
                NodeKind::License
            } else {
                scanner.classify(&file)
            };
            let rel = project_dir.join(&file);
            children.push(Node::at_path(file, kind, rel));
        }

        debug!(project, %project_type, children = children.len(), "Built project");
        Ok(Node::at_path(project, NodeKind::Project(project_type), project_dir)
            .with_children(children))
    }

    /// Mirror one level of the include/src pair, recursing into subfolders on both sides.
    ///
    /// Folders under include come first (include order), then src-only folders (src
    /// order); leaves follow as headers-only, classes, sources-only.
    fn build_code_tree(
        &self,
        scanner: &DirectoryScanner<'_>,
        include: &Path,
        src: &Path,
    ) -> Result<Vec<Node>, ScanError> {
        let layout = &self.config.layout;
        let include_dirs = scanner.list_directories(include)?;
        let src_dirs = scanner.list_directories(src)?;
        let mut nodes = Vec::new();

        for dir in &include_dirs {
            let contents = self.build_code_tree(scanner, &include.join(dir), &src.join(dir))?;
            let folder = Node::at_path(dir.as_str(), NodeKind::Folder, include.join(dir));
            nodes.push(folder.with_children(contents));
        }
        for dir in src_dirs.iter().filter(|d| !include_dirs.contains(d)) {
            // Nothing exists on the include side, so only sources come back.
            let contents = self.build_code_tree(scanner, &include.join(dir), &src.join(dir))?;
            let folder = Node::at_path(dir.as_str(), NodeKind::Folder, src.join(dir));
            nodes.push(folder.with_children(contents));
        }

        let headers = scanner.list_files(include)?;
        let sources = scanner.list_files(src)?;
        let pairing = pair(
            &headers,
            &sources,
            &ExtensionRule::new(&layout.header_extensions),
            &ExtensionRule::new(&layout.source_extensions),
        );

        for header in pairing.headers_only {
            nodes.push(Node::at_path(header, scanner.classify(header), include.join(header)));
        }
        for class in pairing.classes {
            nodes.push(Node::new(
                class.stem,
                NodeKind::ClassEntity,
                NodeLocation::Pair {
                    header: include.join(class.header),
                    source: src.join(class.source),
                },
            ));
        }
        for source in pairing.sources_only {
            nodes.push(Node::at_path(source, scanner.classify(source), src.join(source)));
        }

        Ok(nodes)
    }
}
