//! CLI presentation: text and JSON rendering of the tree, project list, and refresh deltas.

use crate::error::{ArtifactError, ExplorerError};
use crate::explorer::ProjectSummary;
use crate::tree::{Node, NodeChange, NodeKind, RenderDelta};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Render the displayed roots as an indented tree.
pub fn format_tree_text(roots: &[Node], color: bool) -> String {
    let mut out = String::new();
    for root in roots {
        out.push_str(&decorate(root, color));
        out.push('\n');
        write_children(&mut out, root.children(), "", color);
    }
    out.trim_end().to_string()
}

fn write_children(out: &mut String, children: &[Node], prefix: &str, color: bool) {
    let last = children.len().saturating_sub(1);
    for (index, child) in children.iter().enumerate() {
        let (branch, indent) = if index == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&decorate(child, color));
        out.push('\n');
        write_children(out, child.children(), &format!("{}{}", prefix, indent), color);
    }
}

fn decorate(node: &Node, color: bool) -> String {
    let label = node.label();
    let suffix = match node.kind() {
        NodeKind::Project(project_type) => format!(" ({})", project_type),
        NodeKind::UnloadedProject(project_type) => format!(" ({}, unloaded)", project_type),
        NodeKind::Tests { enabled: false } => " (disabled)".to_string(),
        NodeKind::ClassEntity => " (class)".to_string(),
        _ => String::new(),
    };
    if !color {
        return format!("{}{}", label, suffix);
    }
    let label = match node.kind() {
        NodeKind::Workspace => label.bold().underline().to_string(),
        NodeKind::Project(_) => label.bold().to_string(),
        NodeKind::UnloadedProject(_) | NodeKind::Tests { enabled: false } => {
            label.dimmed().to_string()
        }
        NodeKind::ClassEntity => label.cyan().to_string(),
        NodeKind::LibraryGroup | NodeKind::Dependencies | NodeKind::BinariesGroup => {
            label.yellow().to_string()
        }
        kind if kind.is_folder() => label.blue().to_string(),
        _ => label.to_string(),
    };
    if suffix.is_empty() {
        label
    } else {
        format!("{}{}", label, suffix.dimmed())
    }
}

/// Render the displayed roots as pretty JSON.
pub fn format_tree_json(roots: &[Node]) -> Result<String, ExplorerError> {
    serde_json::to_string_pretty(roots)
        .map_err(|e| ExplorerError::Config(format!("Failed to serialize tree: {}", e)))
}

/// Project list as a table.
pub fn format_projects_table(projects: &[ProjectSummary]) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Project", "Type", "Loaded", "Listed"]);
    for project in projects {
        table.add_row(vec![
            project.name.clone(),
            project.project_type.to_string(),
            yes_no(project.loaded).to_string(),
            yes_no(project.listed).to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_projects_json(projects: &[ProjectSummary]) -> Result<String, ExplorerError> {
    serde_json::to_string_pretty(projects)
        .map_err(|e| ExplorerError::Config(format!("Failed to serialize projects: {}", e)))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// One line per change applied to the workspace root's children.
pub fn format_delta(delta: &RenderDelta) -> String {
    if delta.is_empty() && delta.changes.is_empty() {
        return "No changes".to_string();
    }
    let mut lines = Vec::new();
    if !delta.roots_added.is_empty() {
        lines.push(format!("+ {} root(s) added", delta.roots_added.len()));
    }
    if !delta.roots_removed.is_empty() {
        lines.push(format!("- {} root(s) removed", delta.roots_removed.len()));
    }
    for change in &delta.changes {
        lines.push(match change {
            NodeChange::Inserted { label, .. } => format!("+ {}", label),
            NodeChange::Replaced { label, .. } => format!("~ {}", label),
            NodeChange::Removed { label, .. } => format!("- {}", label),
            NodeChange::Rebuilt { label, .. } => format!("~ {} (rebuilt)", label),
        });
    }
    lines.join("\n")
}

/// Warning lines for derived files that could not be written.
pub fn format_write_failures(failures: &[ArtifactError]) -> String {
    failures
        .iter()
        .map(|failure| format!("warning: {}", failure))
        .collect::<Vec<_>>()
        .join("\n")
}
