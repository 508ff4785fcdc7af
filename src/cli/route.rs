//! CLI route: single route table and run context. Dispatches to the explorer and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_delta, format_projects_json, format_projects_table, format_tree_json,
    format_tree_text, format_write_failures,
};
use crate::config::{ConfigLoader, ExplorerConfig};
use crate::error::ExplorerError;
use crate::explorer::{Explorer, NullSink, RefreshReport};
use crate::tree::{Node, RenderDelta};
use crate::watch::{WatchDaemon, WatchOptions};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Runtime context for CLI execution: workspace root and resolved configuration.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: ExplorerConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
    ) -> Result<Self, ExplorerError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        config.validate().map_err(|errors| {
            ExplorerError::Config(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        Ok(Self {
            workspace_root,
            config,
        })
    }

    /// Execute a command and return its printable output.
    pub fn execute(&self, command: &Commands) -> Result<String, ExplorerError> {
        let start = Instant::now();
        let result = match command {
            Commands::Tree { format } => self.handle_tree(*format),
            Commands::Projects { format } => self.handle_projects(*format),
            Commands::Unload { project } => self.handle_set_loaded(project, false),
            Commands::Reload { project } => self.handle_set_loaded(project, true),
            Commands::Watch { debounce_ms } => self.handle_watch(*debounce_ms),
        };
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = start.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn open_explorer(&self) -> Result<Explorer, ExplorerError> {
        Explorer::open(&self.workspace_root, self.config.clone())
    }

    fn handle_tree(&self, format: OutputFormat) -> Result<String, ExplorerError> {
        let mut explorer = self.open_explorer()?;
        let report = explorer.refresh(&mut NullSink)?;
        let body = match format {
            OutputFormat::Text => format_tree_text(explorer.roots(), use_color()),
            OutputFormat::Json => format_tree_json(explorer.roots())?,
        };
        Ok(with_warnings(body, &report))
    }

    fn handle_projects(&self, format: OutputFormat) -> Result<String, ExplorerError> {
        let explorer = self.open_explorer()?;
        let projects = explorer.projects()?;
        match format {
            OutputFormat::Text => Ok(format_projects_table(&projects)),
            OutputFormat::Json => format_projects_json(&projects),
        }
    }

    fn handle_set_loaded(&self, project: &str, loaded: bool) -> Result<String, ExplorerError> {
        let mut explorer = self.open_explorer()?;
        let report = explorer.set_project_loaded(project, loaded, &mut NullSink)?;
        let verb = if loaded { "Reloaded" } else { "Unloaded" };
        Ok(with_warnings(format!("{} project '{}'", verb, project), &report))
    }

    fn handle_watch(&self, debounce_ms: Option<u64>) -> Result<String, ExplorerError> {
        let mut explorer = self.open_explorer()?;
        let mut options = WatchOptions::from_config(&self.config);
        if let Some(ms) = debounce_ms {
            options.debounce = Duration::from_millis(ms);
        }

        let color = use_color();
        let mut first = true;
        let mut sink = |roots: &[Node], delta: &RenderDelta| {
            if first {
                println!("{}", format_tree_text(roots, color));
                first = false;
            } else {
                println!("{}", format_delta(delta));
            }
        };

        WatchDaemon::new(&mut explorer, options).run(&mut sink)?;
        Ok("Watch stopped".to_string())
    }
}

fn with_warnings(body: String, report: &RefreshReport) -> String {
    if report.write_failures.is_empty() {
        body
    } else {
        format!("{}\n{}", body, format_write_failures(&report.write_failures))
    }
}

fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
