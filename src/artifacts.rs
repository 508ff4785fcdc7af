//! Derived artifacts
//!
//! Files the explorer generates inside each project: the internal-access header, the
//! umbrella header that includes every project header, and the source list consumed by the
//! project's build descriptor. Each is written only when its content changes, and failures
//! are collected rather than raised.

use crate::config::ExplorerConfig;
use crate::directives::ProjectOptions;
use crate::error::ArtifactError;
use crate::fs::FileSystem;
use crate::tree::walker::{to_slash, Walker};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files written and failures met while producing artifacts.
#[derive(Debug, Default)]
pub struct ArtifactReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ArtifactError>,
}

impl ArtifactReport {
    fn record(&mut self, result: Result<Option<PathBuf>, ArtifactError>) {
        match result {
            Ok(Some(path)) => self.written.push(path),
            Ok(None) => {}
            Err(e) => {
                warn!(path = %e.path().display(), error = %e, "Artifact not written");
                self.failures.push(e);
            }
        }
    }

    pub fn merge(&mut self, other: ArtifactReport) {
        self.written.extend(other.written);
        self.failures.extend(other.failures);
    }
}

/// Text of the internal-access header for `project`.
pub fn internal_header(project: &str) -> String {
    let guard = project.to_uppercase();
    format!(
        "\
#ifndef INTERNALKEYWORD_HPP
    #define INTERNALKEYWORD_HPP

    #ifndef {guard}INTERNAL
        #define _internal public
    #else
        #define _internal private
    #endif
#endif
"
    )
}

/// Text of the umbrella header including every header in `headers` (project-relative).
pub fn umbrella_header(project: &str, headers: &[String], internal_keyword: bool) -> String {
    let guard = project.to_uppercase();
    let mut text = format!("#ifndef {guard}_HPP\n#define {guard}_HPP\n\n");
    if internal_keyword {
        text.push_str(&format!("    #undef _internal\n    #define {guard}INTERNAL\n\n"));
    }
    for header in headers {
        text.push_str(&format!("    #include \"{}\"\n", header));
    }
    text.push('\n');
    if internal_keyword {
        text.push_str(&format!("    #undef _internal\n    #undef {guard}INTERNAL\n\n"));
    }
    text.push_str(&format!("#endif //{guard}_HPP\n"));
    text
}

/// Text of the source list: `set(SourceFiles ` then one path per line, then `)`.
pub fn source_list(sources: &[String]) -> String {
    let mut text = String::from("set(SourceFiles \n");
    for source in sources {
        text.push_str(source);
        text.push('\n');
    }
    text.push(')');
    text
}

/// Writes the derived files of each project.
pub struct ArtifactWriter<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
    config: &'a ExplorerConfig,
}

impl<'a> ArtifactWriter<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: &'a Path, config: &'a ExplorerConfig) -> Self {
        Self { fs, root, config }
    }

    /// Pre-build artifacts of a loaded project, as selected by its option flags.
    ///
    /// The internal header is written first, so a fresh one is picked up by the umbrella
    /// header's scan in the same pass.
    pub fn prepare_project(&self, project: &str) -> ArtifactReport {
        let mut report = ArtifactReport::default();
        let layout = &self.config.layout;
        let options = ProjectOptions::load(
            self.fs,
            &self.root.join(project).join(&layout.options_file),
        );
        let internal_keyword = options.flag(&self.config.options.internal_keyword);

        if internal_keyword {
            report.record(self.ensure_internal_header(project));
        }
        if options.flag(&self.config.options.combined_header) {
            report.record(self.write_umbrella_header(project, internal_keyword));
        }
        report
    }

    fn ensure_internal_header(&self, project: &str) -> Result<Option<PathBuf>, ArtifactError> {
        let path = self
            .root
            .join(project)
            .join(&self.config.layout.include_dir)
            .join(&self.config.layout.internal_header);
        if self.fs.exists(&path) {
            return Ok(None);
        }
        self.write(path, &internal_header(project), None)
    }

    fn write_umbrella_header(
        &self,
        project: &str,
        internal_keyword: bool,
    ) -> Result<Option<PathBuf>, ArtifactError> {
        let umbrella_name = format!("{}.{}", project, self.primary_header_extension());
        let path = self.root.join(project).join(&umbrella_name);

        let headers: Vec<String> = self
            .collect(project, &self.config.layout.header_extensions, &path)?
            .into_iter()
            .filter(|rel| rel != &umbrella_name)
            .collect();

        let text = umbrella_header(project, &headers, internal_keyword);
        let current = self.read_current(&path);
        self.write(path, &text, current.as_deref())
    }

    /// Regenerate the project's source list. Returns the path when it was rewritten.
    pub fn write_source_list(&self, project: &str) -> Result<Option<PathBuf>, ArtifactError> {
        let path = self
            .root
            .join(project)
            .join(&self.config.layout.source_list_file);
        let sources = self.collect(project, &self.config.layout.source_extensions, &path)?;
        let text = source_list(&sources);
        let current = self.read_current(&path);
        self.write(path, &text, current.as_deref())
    }

    /// Source lists for every project, collected into one report.
    pub fn write_source_lists(&self, projects: &[String]) -> ArtifactReport {
        let mut report = ArtifactReport::default();
        for project in projects {
            report.record(self.write_source_list(project));
        }
        report
    }

    fn primary_header_extension(&self) -> &str {
        self.config
            .layout
            .header_extensions
            .first()
            .map(String::as_str)
            .unwrap_or("hpp")
    }

    /// Project-relative `/`-separated paths of matching files below the project.
    fn collect(
        &self,
        project: &str,
        extensions: &[String],
        artifact: &Path,
    ) -> Result<Vec<String>, ArtifactError> {
        let walker = Walker::new(
            self.fs,
            self.root.join(project),
            &self.config.watch.ignore_names,
        );
        let found = walker
            .collect(extensions)
            .map_err(|source| ArtifactError::Collect {
                path: artifact.to_path_buf(),
                source,
            })?;
        Ok(found.iter().map(|p| to_slash(p)).collect())
    }

    fn read_current(&self, path: &Path) -> Option<String> {
        // An unreadable artifact is simply rewritten.
        self.fs.read_text_file(path).ok().flatten()
    }

    fn write(
        &self,
        path: PathBuf,
        text: &str,
        current: Option<&str>,
    ) -> Result<Option<PathBuf>, ArtifactError> {
        if current == Some(text) {
            return Ok(None);
        }
        self.fs
            .write_text_file(&path, text)
            .map_err(|source| ArtifactError::Write {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "Wrote artifact");
        Ok(Some(path))
    }
}
