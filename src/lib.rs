//! cppex: C++ Workspace Explorer
//!
//! Mirrors a multi-project C++ workspace as a navigable project tree. Each refresh scans
//! the workspace, writes the derived build files (umbrella headers, source lists, the
//! project directive file), and reconciles the result into the displayed tree with as
//! few node replacements as possible.

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod directives;
pub mod error;
pub mod explorer;
pub mod fs;
pub mod logging;
pub mod tree;
pub mod watch;
