//! Configuration System
//!
//! Layered configuration for the explorer: built-in defaults, the user's global config file,
//! a workspace-local config file, and `CPPEX__*` environment overrides, in increasing
//! precedence. The workspace root itself is never stored in global state; it travels with
//! the [`ExplorerConfig`] value into every component.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExplorerConfig {
    /// Display name of the workspace root node (defaults to the root directory name)
    #[serde(default)]
    pub workspace_name: Option<String>,

    /// File and directory naming conventions of the workspace
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Names of the per-project option flags
    #[serde(default)]
    pub options: OptionNames,

    /// Refresh-on-change settings
    #[serde(default)]
    pub watch: WatchSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Workspace layout conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Build descriptor marking the workspace root and each project
    #[serde(default = "default_descriptor_file")]
    pub descriptor_file: String,

    /// Project-local option flags file
    #[serde(default = "default_options_file")]
    pub options_file: String,

    /// Workspace-level project directive file
    #[serde(default = "default_projects_file")]
    pub projects_file: String,

    /// Workspace-level dependency declarations file
    #[serde(default = "default_dependencies_file")]
    pub dependencies_file: String,

    /// Per-project generated source list
    #[serde(default = "default_source_list_file")]
    pub source_list_file: String,

    /// Internal-access header generated under the include directory
    #[serde(default = "default_internal_header")]
    pub internal_header: String,

    #[serde(default = "default_include_dir")]
    pub include_dir: String,

    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Build output directory mirrored as the Binaries root
    #[serde(default = "default_bin_dir")]
    pub bin_dir: String,

    /// Root directories never treated as projects
    #[serde(default = "default_reserved_dirs")]
    pub reserved_dirs: Vec<String>,

    #[serde(default = "default_header_extensions")]
    pub header_extensions: Vec<String>,

    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
}

fn default_descriptor_file() -> String {
    "CMakeLists.txt".to_string()
}

fn default_options_file() -> String {
    "CppExplorerOptions.cmake".to_string()
}

fn default_projects_file() -> String {
    "CppExplorerProjects.cmake".to_string()
}

fn default_dependencies_file() -> String {
    // Spelling matches the file name existing workspaces already carry.
    "CppExplorerDependancies.cmake".to_string()
}

fn default_source_list_file() -> String {
    "SourceFiles.cmake".to_string()
}

fn default_internal_header() -> String {
    "InternalKeyword.hpp".to_string()
}

fn default_include_dir() -> String {
    "include".to_string()
}

fn default_src_dir() -> String {
    "src".to_string()
}

fn default_bin_dir() -> String {
    "bin".to_string()
}

fn default_reserved_dirs() -> Vec<String> {
    vec!["libraries".to_string(), "build".to_string(), "bin".to_string()]
}

fn default_header_extensions() -> Vec<String> {
    vec!["hpp".to_string()]
}

fn default_source_extensions() -> Vec<String> {
    vec!["cpp".to_string()]
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            descriptor_file: default_descriptor_file(),
            options_file: default_options_file(),
            projects_file: default_projects_file(),
            dependencies_file: default_dependencies_file(),
            source_list_file: default_source_list_file(),
            internal_header: default_internal_header(),
            include_dir: default_include_dir(),
            src_dir: default_src_dir(),
            bin_dir: default_bin_dir(),
            reserved_dirs: default_reserved_dirs(),
            header_extensions: default_header_extensions(),
            source_extensions: default_source_extensions(),
        }
    }
}

impl LayoutConfig {
    /// Whether a root-level directory name may be a project.
    pub fn is_project_candidate(&self, name: &str) -> bool {
        !name.starts_with('.') && !self.reserved_dirs.iter().any(|reserved| reserved == name)
    }

    pub fn is_header(&self, file_name: &str) -> bool {
        has_extension(file_name, &self.header_extensions)
    }

    pub fn is_source(&self, file_name: &str) -> bool {
        has_extension(file_name, &self.source_extensions)
    }

    /// Build files that never appear in the project tree.
    pub fn is_build_file(&self, file_name: &str) -> bool {
        file_name.eq_ignore_ascii_case(&self.descriptor_file)
            || file_name.to_ascii_lowercase().ends_with(".cmake")
    }
}

fn has_extension(file_name: &str, extensions: &[String]) -> bool {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => extensions.iter().any(|e| e == ext),
        _ => false,
    }
}

/// Option flag names read from each project's options file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionNames {
    #[serde(default = "default_internal_keyword_option")]
    pub internal_keyword: String,

    #[serde(default = "default_combined_header_option")]
    pub combined_header: String,

    #[serde(default = "default_testing_visible_option")]
    pub testing_visible: String,
}

fn default_internal_keyword_option() -> String {
    "CppEx_EnableInternalKeyword".to_string()
}

fn default_combined_header_option() -> String {
    "CppEx_AutoGenCombinedLibraryHeader".to_string()
}

fn default_testing_visible_option() -> String {
    "CppEx_TestingSectionVisible".to_string()
}

impl Default for OptionNames {
    fn default() -> Self {
        Self {
            internal_keyword: default_internal_keyword_option(),
            combined_header: default_combined_header_option(),
            testing_visible: default_testing_visible_option(),
        }
    }
}

/// Refresh-on-change settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Quiet period after the last filesystem event before refreshing
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Path components whose events never trigger a refresh; directories with these
    /// names are also left out of generated header and source listings
    #[serde(default = "default_ignore_names")]
    pub ignore_names: Vec<String>,
}

fn default_debounce_ms() -> u64 {
    250
}

fn default_ignore_names() -> Vec<String> {
    vec![".git".to_string(), "build".to_string(), ".cppex".to_string()]
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            ignore_names: default_ignore_names(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Layout: {0}")]
    Layout(String),
    #[error("Options: {0}")]
    Options(String),
    #[error("Watch: {0}")]
    Watch(String),
}

impl ExplorerConfig {
    /// Name shown on the workspace root node.
    pub fn resolve_workspace_name(&self, root: &Path) -> String {
        if let Some(name) = self.workspace_name.as_ref().filter(|n| !n.is_empty()) {
            return name.clone();
        }
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string_lossy().into_owned())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let layout = &self.layout;

        for (field, value) in [
            ("descriptor_file", &layout.descriptor_file),
            ("options_file", &layout.options_file),
            ("projects_file", &layout.projects_file),
            ("dependencies_file", &layout.dependencies_file),
            ("source_list_file", &layout.source_list_file),
            ("internal_header", &layout.internal_header),
            ("include_dir", &layout.include_dir),
            ("src_dir", &layout.src_dir),
            ("bin_dir", &layout.bin_dir),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::Layout(format!("{} cannot be empty", field)));
            }
        }

        if layout.include_dir == layout.src_dir {
            errors.push(ValidationError::Layout(format!(
                "include_dir and src_dir must differ (both '{}')",
                layout.include_dir
            )));
        }
        if layout.header_extensions.is_empty() {
            errors.push(ValidationError::Layout(
                "header_extensions cannot be empty".to_string(),
            ));
        }
        if layout.source_extensions.is_empty() {
            errors.push(ValidationError::Layout(
                "source_extensions cannot be empty".to_string(),
            ));
        }
        for ext in &layout.header_extensions {
            if layout.source_extensions.contains(ext) {
                errors.push(ValidationError::Layout(format!(
                    "extension '{}' is both a header and a source extension",
                    ext
                )));
            }
        }

        for (field, value) in [
            ("internal_keyword", &self.options.internal_keyword),
            ("combined_header", &self.options.combined_header),
            ("testing_visible", &self.options.testing_visible),
        ] {
            if value.trim().is_empty() || value.contains(char::is_whitespace) {
                errors.push(ValidationError::Options(format!(
                    "{} must be a single non-empty token",
                    field
                )));
            }
        }

        if self.watch.debounce_ms == 0 {
            errors.push(ValidationError::Watch(
                "debounce_ms must be greater than zero".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
