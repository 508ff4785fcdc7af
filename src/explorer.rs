//! Refresh orchestration
//!
//! [`Explorer`] owns the live tree of one workspace and runs the refresh cycle: validity
//! check, pre-build artifacts, build, reconcile, source lists and directive regeneration,
//! then one `snapshot_ready` call on the render sink.

use crate::artifacts::{ArtifactReport, ArtifactWriter};
use crate::config::ExplorerConfig;
use crate::directives::ProjectRegistry;
use crate::error::{ArtifactError, ExplorerError};
use crate::fs::{FileSystem, LocalFileSystem};
use crate::tree::builder::TreeBuilder;
use crate::tree::node::{Node, ProjectType};
use crate::tree::reconcile::{LiveTree, RenderDelta, TreeReconciler};
use crate::tree::scanner::DirectoryScanner;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Receives the displayed tree after each successful refresh.
pub trait RenderSink {
    fn snapshot_ready(&mut self, roots: &[Node], delta: &RenderDelta);
}

impl<F> RenderSink for F
where
    F: FnMut(&[Node], &RenderDelta),
{
    fn snapshot_ready(&mut self, roots: &[Node], delta: &RenderDelta) {
        self(roots, delta)
    }
}

/// Sink that ignores every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn snapshot_ready(&mut self, _roots: &[Node], _delta: &RenderDelta) {}
}

/// Outcome of one refresh.
#[derive(Debug)]
pub struct RefreshReport {
    pub delta: RenderDelta,
    /// Projects found by the root enumeration, in listing order
    pub projects: Vec<String>,
    /// Generated files rewritten during the refresh
    pub written: Vec<PathBuf>,
    /// Generated files that could not be written; never fatal
    pub write_failures: Vec<ArtifactError>,
    pub duration_ms: u128,
}

/// One row of the project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub project_type: ProjectType,
    pub loaded: bool,
    /// Whether the directive file already names the project
    pub listed: bool,
}

/// A workspace and its displayed tree.
pub struct Explorer<F: FileSystem = LocalFileSystem> {
    fs: F,
    root: PathBuf,
    config: ExplorerConfig,
    workspace_name: String,
    live: LiveTree,
}

impl Explorer<LocalFileSystem> {
    /// Open the workspace at `root` on the local disk.
    pub fn open(root: &Path, config: ExplorerConfig) -> Result<Self, ExplorerError> {
        let root = dunce::canonicalize(root)?;
        Ok(Self::with_filesystem(LocalFileSystem::new(), root, config))
    }
}

impl<F: FileSystem> Explorer<F> {
    pub fn with_filesystem(fs: F, root: PathBuf, config: ExplorerConfig) -> Self {
        let workspace_name = config.resolve_workspace_name(&root);
        Self {
            fs,
            root,
            config,
            workspace_name,
            live: LiveTree::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn workspace_name(&self) -> &str {
        &self.workspace_name
    }

    /// Displayed roots: the workspace, then binaries when present.
    pub fn roots(&self) -> &[Node] {
        self.live.roots()
    }

    pub fn live(&self) -> &LiveTree {
        &self.live
    }

    /// Whether the root carries the workspace descriptor.
    pub fn is_workspace(&self) -> bool {
        self.fs
            .exists(&self.root.join(&self.config.layout.descriptor_file))
    }

    fn ensure_workspace(&self) -> Result<(), ExplorerError> {
        if self.is_workspace() {
            Ok(())
        } else {
            Err(ExplorerError::NotAWorkspace {
                root: self.root.clone(),
                descriptor: self.config.layout.descriptor_file.clone(),
            })
        }
    }

    fn registry(&self) -> ProjectRegistry<'_> {
        ProjectRegistry::new(&self.fs, self.root.join(&self.config.layout.projects_file))
    }

    fn scanner(&self) -> DirectoryScanner<'_> {
        DirectoryScanner::new(&self.fs, &self.root, &self.config.layout)
    }

    /// Run one full refresh cycle.
    ///
    /// A scan failure aborts the refresh before the live tree is touched. Write failures
    /// are collected in the report.
    #[instrument(skip_all, fields(workspace = %self.workspace_name))]
    pub fn refresh(&mut self, sink: &mut dyn RenderSink) -> Result<RefreshReport, ExplorerError> {
        let start = Instant::now();
        self.ensure_workspace()?;

        let fs: &dyn FileSystem = &self.fs;
        let root = self.root.as_path();
        let config = &self.config;
        let writer = ArtifactWriter::new(fs, root, config);
        let registry = ProjectRegistry::new(fs, root.join(&config.layout.projects_file));
        let mut artifacts = ArtifactReport::default();

        let suppressed = registry.suppressed();
        for project in DirectoryScanner::new(fs, root, &config.layout).projects()? {
            if !suppressed.contains(&project) {
                artifacts.merge(writer.prepare_project(&project));
            }
        }

        let snapshot = TreeBuilder::new(fs, root, config).build()?;
        let projects = snapshot.projects.clone();
        let delta =
            TreeReconciler::new(self.workspace_name.as_str()).reconcile(&mut self.live, snapshot);

        artifacts.merge(writer.write_source_lists(&projects));
        match registry.regenerate_directive_list(&projects) {
            Ok(true) => artifacts.written.push(registry.path().to_path_buf()),
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "Directive file not written");
                artifacts.failures.push(e);
            }
        }

        sink.snapshot_ready(self.live.roots(), &delta);

        let duration_ms = start.elapsed().as_millis();
        info!(
            projects = projects.len(),
            changes = delta.changes.len(),
            written = artifacts.written.len(),
            write_failures = artifacts.failures.len(),
            duration_ms,
            "Refresh completed"
        );

        Ok(RefreshReport {
            delta,
            projects,
            written: artifacts.written,
            write_failures: artifacts.failures,
            duration_ms,
        })
    }

    /// Mark a project loaded or unloaded, then refresh.
    pub fn set_project_loaded(
        &mut self,
        project: &str,
        loaded: bool,
        sink: &mut dyn RenderSink,
    ) -> Result<RefreshReport, ExplorerError> {
        self.ensure_workspace()?;
        if !self.scanner().projects()?.iter().any(|p| p == project) {
            return Err(ExplorerError::UnknownProject(project.to_string()));
        }
        let changed = self.registry().set_loaded(project, loaded)?;
        info!(project, loaded, changed, "Project load state updated");
        self.refresh(sink)
    }

    /// Current projects with their type and load state.
    pub fn projects(&self) -> Result<Vec<ProjectSummary>, ExplorerError> {
        self.ensure_workspace()?;
        let scanner = self.scanner();
        let directives = self.registry().directives();
        let listed: HashSet<&str> = directives.iter().map(|d| d.project.as_str()).collect();
        let suppressed: HashSet<&str> = directives
            .iter()
            .filter(|d| !d.active)
            .map(|d| d.project.as_str())
            .collect();

        let projects = scanner
            .projects()?
            .into_iter()
            .map(|name| ProjectSummary {
                project_type: scanner.project_type(&name),
                loaded: !suppressed.contains(name.as_str()),
                listed: listed.contains(name.as_str()),
                name,
            })
            .collect();
        Ok(projects)
    }
}
