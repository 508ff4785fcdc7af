//! Error types for the workspace explorer.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem read errors raised while scanning the workspace.
///
/// Missing paths never surface here: listings and reads of absent paths are empty.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to list directory {path:?}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures writing derived files (umbrella headers, source lists, directive file).
///
/// These are collected per refresh and never abort it.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to collect inputs for {path:?}: {source}")]
    Collect {
        path: PathBuf,
        #[source]
        source: ScanError,
    },
}

impl ArtifactError {
    /// Path of the artifact that could not be produced.
    pub fn path(&self) -> &PathBuf {
        match self {
            ArtifactError::Write { path, .. } | ArtifactError::Collect { path, .. } => path,
        }
    }
}

/// Refresh-level and command-level errors.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Not a workspace: {descriptor} not found in {root:?}")]
    NotAWorkspace { root: PathBuf, descriptor: String },

    #[error("Unknown project: {0}")]
    UnknownProject(String),

    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Write failed: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ExplorerError {
    fn from(err: config::ConfigError) -> Self {
        ExplorerError::Config(err.to_string())
    }
}
