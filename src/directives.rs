//! Persisted text directives
//!
//! Line-oriented CMake fragments the explorer reads and rewrites: the workspace project
//! list, per-project option flags, and workspace dependency declarations. Unparseable
//! lines are skipped and default to their safe value.

pub mod dependencies;
pub mod options;
pub mod projects;

pub use dependencies::{load_dependencies, parse_dependencies};
pub use options::ProjectOptions;
pub use projects::{ProjectDirective, ProjectRegistry};

use crate::tree::node::ProjectType;

/// Inner text of `command(...)` when `line` is a call to `command`.
///
/// Command names match case-insensitively, as CMake does. Leading whitespace is allowed;
/// anything after the closing parenthesis is ignored.
pub(crate) fn call_argument<'l>(line: &'l str, command: &str) -> Option<&'l str> {
    let trimmed = line.trim_start();
    let head = trimmed.get(..command.len())?;
    if !head.eq_ignore_ascii_case(command) {
        return None;
    }
    let rest = trimmed[command.len()..].trim_start().strip_prefix('(')?;
    let close = rest.find(')')?;
    Some(&rest[..close])
}

/// Project type from descriptor text: a library iff it calls `add_library(`.
pub fn project_type(descriptor: &str) -> ProjectType {
    if descriptor.to_ascii_lowercase().contains("add_library(") {
        ProjectType::Library
    } else {
        ProjectType::Executable
    }
}
