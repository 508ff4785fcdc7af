//! Integration tests for the C++ workspace explorer

mod derived_artifacts;
mod project_directives;
mod refresh_scenarios;
pub mod test_utils;
