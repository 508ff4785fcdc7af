//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ExplorerError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &ExplorerError) -> String {
    match e {
        ExplorerError::NotAWorkspace { root, descriptor } => format!(
            "{} is not a workspace (no {} at its root)",
            root.display(),
            descriptor
        ),
        ExplorerError::UnknownProject(name) => {
            format!("No project named '{}' in this workspace", name)
        }
        other => other.to_string(),
    }
}
