//! Tree reconciliation
//!
//! Merges a freshly built [`WorkspaceSnapshot`] into the live tree, keeping every node
//! whose subtree is structurally unchanged so its identity (and any UI state bound to it)
//! survives the refresh.

use crate::tree::builder::{WorkspaceSnapshot, LIBRARIES_LABEL};
use crate::tree::node::{Node, NodeId, NodeKind};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// One change applied to a direct child of the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum NodeChange {
    Inserted { label: String, node: NodeId },
    Replaced { label: String, old: NodeId, new: NodeId },
    Removed { label: String, node: NodeId },
    /// Libraries group kept, its dependency refs rebuilt
    Rebuilt { label: String, node: NodeId },
}

/// What a render sink needs to redraw after a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderDelta {
    pub roots_added: Vec<NodeId>,
    pub roots_removed: Vec<NodeId>,
    /// Kept roots whose subtree changed
    pub roots_changed: Vec<NodeId>,
    pub changes: Vec<NodeChange>,
}

impl RenderDelta {
    pub fn is_empty(&self) -> bool {
        self.roots_added.is_empty()
            && self.roots_removed.is_empty()
            && self.roots_changed.is_empty()
    }
}

/// The displayed tree: the workspace root first, then the binaries root when present.
#[derive(Debug, Default)]
pub struct LiveTree {
    roots: Vec<Node>,
}

impl LiveTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn workspace(&self) -> Option<&Node> {
        self.roots.iter().find(|r| r.kind() == NodeKind::Workspace)
    }

    pub fn binaries(&self) -> Option<&Node> {
        self.roots.iter().find(|r| r.kind() == NodeKind::BinariesGroup)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.roots.iter().find_map(|r| r.find(id))
    }
}

/// Merges snapshots into a [`LiveTree`].
pub struct TreeReconciler {
    workspace_name: String,
}

impl TreeReconciler {
    pub fn new(workspace_name: impl Into<String>) -> Self {
        Self {
            workspace_name: workspace_name.into(),
        }
    }

    #[instrument(skip_all, fields(workspace = %self.workspace_name))]
    pub fn reconcile(&self, live: &mut LiveTree, snapshot: WorkspaceSnapshot) -> RenderDelta {
        let WorkspaceSnapshot {
            root: candidate,
            binaries,
            projects,
        } = snapshot;
        let mut delta = RenderDelta::default();

        let reusable = live
            .roots
            .first()
            .map_or(false, |r| r.kind() == NodeKind::Workspace && r.label() == self.workspace_name);

        if !reusable {
            delta.roots_removed.extend(live.roots.drain(..).map(|r| r.id()));
            delta.roots_added.push(candidate.id());
            live.roots.push(candidate);
            if let Some(binaries) = binaries {
                delta.roots_added.push(binaries.id());
                live.roots.push(binaries);
            }
            info!(roots = live.roots.len(), "Adopted fresh tree");
            return delta;
        }

        let workspace = &mut live.roots[0];
        // Stale children go first so build positions line up with live positions.
        sweep_stale(workspace, &projects, &mut delta.changes);
        for (index, child) in candidate.into_children().into_iter().enumerate() {
            if child.kind() == NodeKind::LibraryGroup {
                merge_libraries(workspace, child, index, &mut delta.changes);
            } else {
                merge_child(workspace, child, index, &mut delta.changes);
            }
        }

        if !delta.changes.is_empty() {
            delta.roots_changed.push(workspace.id());
        }

        reconcile_binaries(&mut live.roots, binaries, &mut delta);

        info!(
            changes = delta.changes.len(),
            roots_added = delta.roots_added.len(),
            roots_removed = delta.roots_removed.len(),
            "Reconciled tree"
        );
        delta
    }
}

/// Keep an equal child, replace an unequal one in place, or insert a missing one at the
/// position the build produced.
pub fn merge_child(
    parent: &mut Node,
    candidate: Node,
    index: usize,
    changes: &mut Vec<NodeChange>,
) {
    let label = candidate.label().to_string();
    match parent.child_position(&label, Some(&candidate.kind())) {
        Some(position) => {
            if parent.children()[position].structurally_eq(&candidate) {
                return;
            }
            let new = candidate.id();
            if let Some(old) = parent.replace_child(position, candidate) {
                debug!(label = %label, "Replaced changed subtree");
                changes.push(NodeChange::Replaced {
                    label,
                    old: old.id(),
                    new,
                });
            }
        }
        None => {
            debug!(label = %label, index, "Inserted new subtree");
            changes.push(NodeChange::Inserted {
                label,
                node: candidate.id(),
            });
            parent.insert_child(index, candidate);
        }
    }
}

/// The Libraries group is created once; its refs are rebuilt only when the declared count
/// differs from the displayed count.
fn merge_libraries(
    workspace: &mut Node,
    candidate: Node,
    index: usize,
    changes: &mut Vec<NodeChange>,
) {
    let existing = workspace
        .children()
        .iter()
        .position(|c| c.kind() == NodeKind::LibraryGroup);
    let Some(position) = existing else {
        changes.push(NodeChange::Inserted {
            label: LIBRARIES_LABEL.to_string(),
            node: candidate.id(),
        });
        workspace.insert_child(index, candidate);
        return;
    };
    let Some(libraries) = workspace.child_mut(position) else {
        return;
    };
    if libraries.children().len() == candidate.children().len() {
        return;
    }

    libraries.truncate_children(1);
    for library in candidate.into_children().into_iter().skip(1) {
        libraries.push_child(library);
    }
    debug!(count = libraries.children().len(), "Rebuilt library refs");
    changes.push(NodeChange::Rebuilt {
        label: LIBRARIES_LABEL.to_string(),
        node: libraries.id(),
    });
}

/// Drop workspace children that no longer name a current project.
fn sweep_stale(workspace: &mut Node, projects: &[String], changes: &mut Vec<NodeChange>) {
    let current: HashSet<&str> = projects.iter().map(String::as_str).collect();
    workspace.retain_children(|child| {
        let keep = child.kind() == NodeKind::LibraryGroup || current.contains(child.label());
        if !keep {
            debug!(label = %child.label(), "Removed stale project");
            changes.push(NodeChange::Removed {
                label: child.label().to_string(),
                node: child.id(),
            });
        }
        keep
    });
}

fn reconcile_binaries(roots: &mut Vec<Node>, candidate: Option<Node>, delta: &mut RenderDelta) {
    let existing = roots.iter().position(|r| r.kind() == NodeKind::BinariesGroup);
    match (existing, candidate) {
        (Some(position), Some(candidate)) => {
            if roots[position].structurally_eq(&candidate) {
                return;
            }
            delta.roots_added.push(candidate.id());
            let old = std::mem::replace(&mut roots[position], candidate);
            delta.roots_removed.push(old.id());
        }
        (Some(position), None) => {
            let old = roots.remove(position);
            delta.roots_removed.push(old.id());
        }
        (None, Some(candidate)) => {
            delta.roots_added.push(candidate.id());
            roots.push(candidate);
        }
        (None, None) => {}
    }
}
