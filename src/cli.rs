//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; a single route table dispatches to the explorer.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_delta, format_projects_json, format_projects_table, format_tree_json,
    format_tree_text, format_write_failures,
};
pub use route::RunContext;
