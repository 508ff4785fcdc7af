//! Property-based tests for tree reconciliation

use cppex::tree::builder::{LIBRARIES_LABEL, STANDARD_LIBRARY_LABEL};
use cppex::tree::{LiveTree, Node, NodeKind, ProjectType, TreeReconciler, WorkspaceSnapshot};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

type Layout = BTreeMap<String, BTreeSet<String>>;

fn layouts() -> impl Strategy<Value = Layout> {
    prop::collection::btree_map(
        "[A-F]",
        prop::collection::btree_set("[a-d]\\.cpp", 0..4),
        0..6,
    )
}

fn snapshot(layout: &Layout) -> WorkspaceSnapshot {
    let mut children = vec![Node::virtual_node(LIBRARIES_LABEL, NodeKind::LibraryGroup)
        .with_children(vec![Node::virtual_node(STANDARD_LIBRARY_LABEL, NodeKind::LibraryRef)])];
    for (name, files) in layout {
        let leaves = files
            .iter()
            .map(|f| Node::at_path(f.as_str(), NodeKind::Source, format!("{}/{}", name, f)))
            .collect();
        children.push(
            Node::at_path(name.as_str(), NodeKind::Project(ProjectType::Executable), name.as_str())
                .with_children(leaves),
        );
    }
    WorkspaceSnapshot {
        root: Node::virtual_node("W", NodeKind::Workspace).with_children(children),
        binaries: None,
        projects: layout.keys().cloned().collect(),
    }
}

proptest! {
    /// Reconciling any displayed tree towards a layout gives the tree a fresh build of that
    /// layout would give, and projects whose content did not change keep their nodes.
    #[test]
    fn prop_reconcile_converges_and_keeps_unchanged(before in layouts(), after in layouts()) {
        let reconciler = TreeReconciler::new("W");
        let mut live = LiveTree::new();
        reconciler.reconcile(&mut live, snapshot(&before));

        let kept: Vec<(String, Vec<_>)> = live
            .workspace()
            .unwrap()
            .children()
            .iter()
            .filter(|p| {
                before.get(p.label()).is_some() && before.get(p.label()) == after.get(p.label())
            })
            .map(|p| (p.label().to_string(), p.ids()))
            .collect();

        reconciler.reconcile(&mut live, snapshot(&after));
        let workspace = live.workspace().unwrap();

        prop_assert!(workspace.structurally_eq(&snapshot(&after).root));
        for (label, ids) in kept {
            prop_assert_eq!(workspace.child(&label).unwrap().ids(), ids);
        }
    }
}
