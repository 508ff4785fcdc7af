//! Integration tests for full refresh cycles: build, reconcile, and node identity

use crate::integration::test_utils::{engine_and_app, labels, Workspace};
use cppex::config::ExplorerConfig;
use cppex::error::ExplorerError;
use cppex::explorer::{Explorer, NullSink};
use cppex::tree::{Node, NodeChange, NodeKind, ProjectType, RenderDelta};
use tempfile::TempDir;

fn open(ws: &Workspace) -> Explorer {
    Explorer::open(ws.root(), ExplorerConfig::default()).unwrap()
}

fn workspace(explorer: &Explorer) -> &Node {
    &explorer.roots()[0]
}

#[test]
fn test_engine_and_app_tree_shape() {
    let ws = engine_and_app();
    let mut explorer = open(&ws);
    explorer.refresh(&mut NullSink).unwrap();

    let root = workspace(&explorer);
    assert_eq!(root.kind(), NodeKind::Workspace);
    assert_eq!(labels(root), vec!["Libraries", "App", "Engine"]);
    assert_eq!(labels(root.child("Libraries").unwrap()), vec!["Standard Library"]);

    let engine = root.child("Engine").unwrap();
    assert_eq!(engine.kind(), NodeKind::Project(ProjectType::Library));
    assert_eq!(labels(engine), vec!["Dependencies", "Tests", "Math"]);
    assert_eq!(engine.children()[2].kind(), NodeKind::ClassEntity);

    let app = root.child("App").unwrap();
    assert_eq!(app.kind(), NodeKind::Project(ProjectType::Executable));
    assert_eq!(labels(app), vec!["Dependencies", "Tests", "main.cpp"]);
    assert_eq!(app.children()[2].kind(), NodeKind::Source);
}

#[test]
fn test_deleting_source_turns_class_into_header() {
    let ws = engine_and_app();
    let mut explorer = open(&ws);
    explorer.refresh(&mut NullSink).unwrap();

    let root_id = workspace(&explorer).id();
    let app_id = workspace(&explorer).child("App").unwrap().id();
    let libraries_id = workspace(&explorer).child("Libraries").unwrap().id();
    let old_engine_id = workspace(&explorer).child("Engine").unwrap().id();

    ws.remove("Engine/src/Math.cpp");
    let report = explorer.refresh(&mut NullSink).unwrap();

    let root = workspace(&explorer);
    let engine = root.child("Engine").unwrap();
    assert_eq!(labels(engine), vec!["Dependencies", "Tests", "Math.hpp"]);
    assert_eq!(engine.children()[2].kind(), NodeKind::Header);

    // Only the changed project was replaced.
    assert_eq!(root.id(), root_id);
    assert_eq!(root.child("App").unwrap().id(), app_id);
    assert_eq!(root.child("Libraries").unwrap().id(), libraries_id);
    assert_eq!(
        report.delta.changes,
        vec![NodeChange::Replaced {
            label: "Engine".to_string(),
            old: old_engine_id,
            new: engine.id(),
        }]
    );
    assert_eq!(report.delta.roots_changed, vec![root_id]);
}

#[test]
fn test_adding_header_leaves_other_project_untouched() {
    let ws = engine_and_app();
    let mut explorer = open(&ws);
    explorer.refresh(&mut NullSink).unwrap();
    let app_ids = workspace(&explorer).child("App").unwrap().ids();

    ws.touch("Engine/include/Foo.hpp");
    explorer.refresh(&mut NullSink).unwrap();

    let root = workspace(&explorer);
    assert_eq!(root.child("App").unwrap().ids(), app_ids);
    let engine = root.child("Engine").unwrap();
    assert_eq!(labels(engine), vec!["Dependencies", "Tests", "Foo.hpp", "Math"]);
    assert_eq!(engine.children()[2].kind(), NodeKind::Header);
}

#[test]
fn test_refresh_is_idempotent() {
    let ws = engine_and_app();
    ws.touch("bin/App");
    let mut explorer = open(&ws);
    explorer.refresh(&mut NullSink).unwrap();
    let before: Vec<_> = explorer.roots().iter().flat_map(Node::ids).collect();

    let report = explorer.refresh(&mut NullSink).unwrap();
    let after: Vec<_> = explorer.roots().iter().flat_map(Node::ids).collect();

    assert_eq!(report.delta, RenderDelta::default());
    assert_eq!(before, after);
}

#[test]
fn test_removed_project_is_swept() {
    let ws = engine_and_app();
    let mut explorer = open(&ws);
    explorer.refresh(&mut NullSink).unwrap();
    let engine_id = workspace(&explorer).child("Engine").unwrap().id();
    let app_id = workspace(&explorer).child("App").unwrap().id();

    ws.remove_dir("App");
    let report = explorer.refresh(&mut NullSink).unwrap();

    let root = workspace(&explorer);
    assert_eq!(labels(root), vec!["Libraries", "Engine"]);
    assert_eq!(root.child("Engine").unwrap().id(), engine_id);
    assert_eq!(
        report.delta.changes,
        vec![NodeChange::Removed {
            label: "App".to_string(),
            node: app_id,
        }]
    );
}

#[test]
fn test_descriptor_removal_drops_project() {
    let ws = engine_and_app();
    let mut explorer = open(&ws);
    explorer.refresh(&mut NullSink).unwrap();

    ws.remove("Engine/CMakeLists.txt");
    explorer.refresh(&mut NullSink).unwrap();

    assert_eq!(labels(workspace(&explorer)), vec!["Libraries", "App"]);
}

#[test]
fn test_new_project_inserted_in_listing_position() {
    let ws = engine_and_app();
    let mut explorer = open(&ws);
    explorer.refresh(&mut NullSink).unwrap();
    let app_id = workspace(&explorer).child("App").unwrap().id();

    ws.write("Audio/CMakeLists.txt", "add_library(Audio SHARED)\n");
    let report = explorer.refresh(&mut NullSink).unwrap();

    let root = workspace(&explorer);
    assert_eq!(labels(root), vec!["Libraries", "App", "Audio", "Engine"]);
    assert_eq!(root.child("App").unwrap().id(), app_id);
    assert!(matches!(
        report.delta.changes.as_slice(),
        [NodeChange::Inserted { label, .. }] if label == "Audio"
    ));
}

#[test]
fn test_binaries_root_follows_bin_directory() {
    let ws = engine_and_app();
    ws.touch("bin/Debug/App");
    let mut explorer = open(&ws);
    explorer.refresh(&mut NullSink).unwrap();

    assert_eq!(explorer.roots().len(), 2);
    let binaries = &explorer.roots()[1];
    assert_eq!(binaries.kind(), NodeKind::BinariesGroup);
    assert_eq!(labels(binaries), vec!["Debug"]);
    let binaries_id = binaries.id();

    ws.remove_dir("bin");
    let report = explorer.refresh(&mut NullSink).unwrap();
    assert_eq!(explorer.roots().len(), 1);
    assert_eq!(report.delta.roots_removed, vec![binaries_id]);
}

#[test]
fn test_library_refs_rebuild_only_when_count_changes() {
    let ws = engine_and_app();
    ws.write("CppExplorerDependancies.cmake", "FIND_PACKAGE(Boost REQUIRED)\n");
    let mut explorer = open(&ws);
    explorer.refresh(&mut NullSink).unwrap();
    let libraries_id = workspace(&explorer).child("Libraries").unwrap().id();
    assert_eq!(
        labels(workspace(&explorer).child("Libraries").unwrap()),
        vec!["Standard Library", "Boost"]
    );

    // Same count: the displayed refs stay as they are.
    ws.write("CppExplorerDependancies.cmake", "FIND_PACKAGE(fmt REQUIRED)\n");
    let report = explorer.refresh(&mut NullSink).unwrap();
    assert!(report.delta.changes.is_empty());
    assert_eq!(
        labels(workspace(&explorer).child("Libraries").unwrap()),
        vec!["Standard Library", "Boost"]
    );

    ws.write(
        "CppExplorerDependancies.cmake",
        "FIND_PACKAGE(fmt REQUIRED)\nFIND_PACKAGE(SDL2 REQUIRED)\n",
    );
    let report = explorer.refresh(&mut NullSink).unwrap();
    let libraries = workspace(&explorer).child("Libraries").unwrap();
    assert_eq!(labels(libraries), vec!["Standard Library", "fmt", "SDL2"]);
    assert_eq!(libraries.id(), libraries_id);
    assert_eq!(
        report.delta.changes,
        vec![NodeChange::Rebuilt {
            label: "Libraries".to_string(),
            node: libraries_id,
        }]
    );
}

#[test]
fn test_sink_sees_every_refresh() {
    let ws = engine_and_app();
    let mut explorer = open(&ws);
    let mut seen = Vec::new();
    {
        let mut sink = |roots: &[Node], delta: &RenderDelta| {
            seen.push((roots.len(), delta.roots_added.len(), delta.changes.len()));
        };
        explorer.refresh(&mut sink).unwrap();
        explorer.refresh(&mut sink).unwrap();
    }
    assert_eq!(seen, vec![(1, 1, 0), (1, 0, 0)]);
}

#[test]
fn test_workspace_name_override() {
    let ws = engine_and_app();
    let config = ExplorerConfig {
        workspace_name: Some("Cosmos".to_string()),
        ..ExplorerConfig::default()
    };
    let mut explorer = Explorer::open(ws.root(), config).unwrap();
    explorer.refresh(&mut NullSink).unwrap();

    assert_eq!(explorer.workspace_name(), "Cosmos");
    assert_eq!(workspace(&explorer).label(), "Cosmos");
}

#[test]
fn test_missing_root_descriptor_is_not_a_workspace() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("App")).unwrap();
    let mut explorer = Explorer::open(temp_dir.path(), ExplorerConfig::default()).unwrap();

    let err = explorer.refresh(&mut NullSink).unwrap_err();
    assert!(matches!(err, ExplorerError::NotAWorkspace { .. }));
    assert!(explorer.roots().is_empty());
}

#[test]
fn test_project_named_libraries_keeps_group() {
    let ws = Workspace::new();
    ws.write("Libraries/CMakeLists.txt", "add_library(Libraries STATIC)\n");
    ws.touch("Libraries/include/Pool.hpp");
    ws.touch("Libraries/src/Pool.cpp");
    let mut explorer = open(&ws);

    for _ in 0..3 {
        explorer.refresh(&mut NullSink).unwrap();
        let kinds: Vec<NodeKind> = workspace(&explorer)
            .children()
            .iter()
            .map(Node::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::LibraryGroup,
                NodeKind::Project(ProjectType::Library)
            ]
        );
    }
    let group = &workspace(&explorer).children()[0];
    assert_eq!(labels(group), vec!["Standard Library"]);
    let project = &workspace(&explorer).children()[1];
    assert_eq!(labels(project), vec!["Dependencies", "Tests", "Pool"]);
}

#[test]
fn test_non_utf8_descriptor_does_not_abort_refresh() {
    let ws = engine_and_app();
    ws.write_bytes(
        "Engine/CMakeLists.txt",
        b"# Soci\xe9t\xe9 G\xe9n\xe9rale\nadd_library(Engine STATIC)\n",
    );
    let mut explorer = open(&ws);
    let report = explorer.refresh(&mut NullSink).unwrap();

    assert_eq!(report.projects, vec!["App", "Engine"]);
    let root = workspace(&explorer);
    let engine = root.child("Engine").unwrap();
    assert_eq!(engine.kind(), NodeKind::Project(ProjectType::Library));
    assert_eq!(labels(engine), vec!["Dependencies", "Tests", "Math"]);
    assert_eq!(
        explorer.projects().unwrap()[1].project_type,
        ProjectType::Library
    );
}
