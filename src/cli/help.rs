//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name string for log fields (e.g. "tree", "unload").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Tree { .. } => "tree",
        Commands::Projects { .. } => "projects",
        Commands::Unload { .. } => "unload",
        Commands::Reload { .. } => "reload",
        Commands::Watch { .. } => "watch",
    }
}
