//! Project directive file
//!
//! One `ADD_SUBDIRECTORY("<name>")` line per project; a leading `#` suppresses the project
//! from the build and marks it unloaded in the tree.

use crate::directives::call_argument;
use crate::error::ArtifactError;
use crate::fs::FileSystem;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const COMMAND: &str = "ADD_SUBDIRECTORY";
const SUPPRESS_MARKER: char = '#';

/// One parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDirective {
    pub project: String,
    pub active: bool,
}

impl ProjectDirective {
    pub fn new(project: impl Into<String>, active: bool) -> Self {
        Self {
            project: project.into(),
            active,
        }
    }

    /// Parse a directive line; anything else (comments, blank lines, other commands) is `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        let (active, call) = match trimmed.strip_prefix(SUPPRESS_MARKER) {
            Some(rest) => (false, rest),
            None => (true, trimmed),
        };
        let argument = call_argument(call, COMMAND)?.trim();
        let project = match argument
            .strip_prefix('"')
            .and_then(|a| a.strip_suffix('"'))
        {
            Some(quoted) => quoted,
            // Unquoted arguments split on whitespace in CMake.
            None if argument.contains(char::is_whitespace) => return None,
            None => argument,
        };
        if project.is_empty() {
            return None;
        }
        Some(Self::new(project, active))
    }

    /// Canonical line text, without a trailing newline.
    pub fn render(&self) -> String {
        let marker = if self.active { "" } else { "#" };
        format!("{}{}(\"{}\")", marker, COMMAND, self.project)
    }
}

/// Reads and rewrites the workspace project directive file.
pub struct ProjectRegistry<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> ProjectRegistry<'a> {
    pub fn new(fs: &'a dyn FileSystem, path: PathBuf) -> Self {
        Self { fs, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File contents; unreadable or missing files read as empty.
    fn contents(&self) -> String {
        match self.fs.read_text_file(&self.path) {
            Ok(Some(text)) => text,
            Ok(None) => String::new(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Unreadable directive file, treating as empty"
                );
                String::new()
            }
        }
    }

    /// Parsed directives in file order; unparseable lines are skipped.
    pub fn directives(&self) -> Vec<ProjectDirective> {
        self.contents()
            .lines()
            .filter_map(ProjectDirective::parse)
            .collect()
    }

    /// Loaded unless a suppressed directive names the project.
    pub fn is_loaded(&self, project: &str) -> bool {
        !self
            .directives()
            .iter()
            .any(|d| d.project == project && !d.active)
    }

    /// Projects named by at least one suppressed directive.
    pub fn suppressed(&self) -> HashSet<String> {
        self.directives()
            .into_iter()
            .filter(|d| !d.active)
            .map(|d| d.project)
            .collect()
    }

    /// Toggle every directive naming `project`, leaving all other bytes untouched.
    ///
    /// Appends a directive in the requested state when none exists. Returns whether the
    /// file changed.
    pub fn set_loaded(&self, project: &str, loaded: bool) -> Result<bool, ArtifactError> {
        let old = self.contents();
        let mut new = String::with_capacity(old.len() + 32);
        let mut matched = false;

        for segment in old.split_inclusive('\n') {
            let body = segment.trim_end_matches(&['\n', '\r'][..]);
            match ProjectDirective::parse(body) {
                Some(directive) if directive.project == project => {
                    matched = true;
                    let indent = &body[..body.len() - body.trim_start().len()];
                    new.push_str(indent);
                    new.push_str(&ProjectDirective::new(project, loaded).render());
                    new.push_str(&segment[body.len()..]);
                }
                _ => new.push_str(segment),
            }
        }

        if !matched {
            if !new.is_empty() && !new.ends_with('\n') {
                new.push('\n');
            }
            new.push_str(&ProjectDirective::new(project, loaded).render());
            new.push('\n');
        }

        debug!(project, loaded, appended = !matched, "Set project load state");
        self.write_if_changed(&old, &new)
    }

    /// Rewrite the file for `known` projects in the given order.
    ///
    /// Suppressed state carries over for projects already listed; new projects are
    /// active; projects no longer known are dropped.
    pub fn regenerate_directive_list(&self, known: &[String]) -> Result<bool, ArtifactError> {
        let old = self.contents();
        let suppressed: HashSet<String> = old
            .lines()
            .filter_map(ProjectDirective::parse)
            .filter(|d| !d.active)
            .map(|d| d.project)
            .collect();

        let mut new = String::new();
        for project in known {
            let directive = ProjectDirective::new(project.as_str(), !suppressed.contains(project));
            new.push_str(&directive.render());
            new.push('\n');
        }

        let changed = self.write_if_changed(&old, &new)?;
        if changed {
            info!(
                path = %self.path.display(),
                projects = known.len(),
                "Regenerated project directives"
            );
        }
        Ok(changed)
    }

    fn write_if_changed(&self, old: &str, new: &str) -> Result<bool, ArtifactError> {
        if old == new {
            return Ok(false);
        }
        self.fs
            .write_text_file(&self.path, new)
            .map_err(|source| ArtifactError::Write {
                path: self.path.clone(),
                source,
            })?;
        Ok(true)
    }
}
