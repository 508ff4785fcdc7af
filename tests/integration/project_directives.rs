//! Integration tests for project load state and the directive file

use crate::integration::test_utils::{engine_and_app, labels, Workspace};
use cppex::config::ExplorerConfig;
use cppex::error::ExplorerError;
use cppex::explorer::{Explorer, NullSink, ProjectSummary};
use cppex::tree::{NodeChange, NodeKind, ProjectType};

const DIRECTIVES: &str = "CppExplorerProjects.cmake";

#[test]
fn test_refresh_writes_directive_per_project() {
    let ws = engine_and_app();
    let mut explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();
    let report = explorer.refresh(&mut NullSink).unwrap();

    assert_eq!(
        ws.read(DIRECTIVES),
        "ADD_SUBDIRECTORY(\"App\")\nADD_SUBDIRECTORY(\"Engine\")\n"
    );
    assert!(report.written.iter().any(|p| p.ends_with(DIRECTIVES)));

    // Unchanged on the next refresh.
    let report = explorer.refresh(&mut NullSink).unwrap();
    assert!(!report.written.iter().any(|p| p.ends_with(DIRECTIVES)));
}

#[test]
fn test_unload_and_reload_project() {
    let ws = engine_and_app();
    let mut explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();
    explorer.refresh(&mut NullSink).unwrap();
    let app_id = explorer.roots()[0].child("App").unwrap().id();

    let report = explorer.set_project_loaded("Engine", false, &mut NullSink).unwrap();
    assert!(ws.read(DIRECTIVES).contains("#ADD_SUBDIRECTORY(\"Engine\")"));
    let engine = explorer.roots()[0].child("Engine").unwrap();
    assert_eq!(engine.kind(), NodeKind::UnloadedProject(ProjectType::Library));
    assert!(engine.children().is_empty());
    assert_eq!(explorer.roots()[0].child("App").unwrap().id(), app_id);
    assert!(matches!(
        report.delta.changes.as_slice(),
        [NodeChange::Replaced { label, .. }] if label == "Engine"
    ));

    explorer.set_project_loaded("Engine", true, &mut NullSink).unwrap();
    assert_eq!(
        ws.read(DIRECTIVES),
        "ADD_SUBDIRECTORY(\"App\")\nADD_SUBDIRECTORY(\"Engine\")\n"
    );
    let engine = explorer.roots()[0].child("Engine").unwrap();
    assert_eq!(engine.kind(), NodeKind::Project(ProjectType::Library));
    assert_eq!(labels(engine), vec!["Dependencies", "Tests", "Math"]);
}

#[test]
fn test_unload_project_with_spaced_name() {
    let ws = Workspace::new();
    ws.write("My App/CMakeLists.txt", "add_executable(MyApp main.cpp)\n");
    ws.touch("My App/main.cpp");
    let mut explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();
    explorer.refresh(&mut NullSink).unwrap();
    assert_eq!(ws.read(DIRECTIVES), "ADD_SUBDIRECTORY(\"My App\")\n");

    explorer.set_project_loaded("My App", false, &mut NullSink).unwrap();
    assert_eq!(ws.read(DIRECTIVES), "#ADD_SUBDIRECTORY(\"My App\")\n");
    assert_eq!(
        explorer.roots()[0].child("My App").unwrap().kind(),
        NodeKind::UnloadedProject(ProjectType::Executable)
    );
    let summaries = explorer.projects().unwrap();
    assert_eq!(summaries.len(), 1);
    assert!(!summaries[0].loaded);

    // A later refresh keeps the suppression.
    explorer.refresh(&mut NullSink).unwrap();
    assert_eq!(ws.read(DIRECTIVES), "#ADD_SUBDIRECTORY(\"My App\")\n");
}

#[test]
fn test_hand_suppressed_project_stays_unloaded() {
    let ws = engine_and_app();
    ws.write(DIRECTIVES, "#ADD_SUBDIRECTORY(\"App\")\nADD_SUBDIRECTORY(\"Gone\")\n");
    let mut explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();
    explorer.refresh(&mut NullSink).unwrap();

    // Suppression carries over; the stale entry is dropped.
    assert_eq!(
        ws.read(DIRECTIVES),
        "#ADD_SUBDIRECTORY(\"App\")\nADD_SUBDIRECTORY(\"Engine\")\n"
    );
    assert_eq!(
        explorer.roots()[0].child("App").unwrap().kind(),
        NodeKind::UnloadedProject(ProjectType::Executable)
    );
}

#[test]
fn test_unknown_project_is_rejected() {
    let ws = engine_and_app();
    let mut explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();

    let err = explorer
        .set_project_loaded("Ghost", false, &mut NullSink)
        .unwrap_err();
    assert!(matches!(err, ExplorerError::UnknownProject(ref name) if name == "Ghost"));
    assert!(!ws.exists(DIRECTIVES));
}

#[test]
fn test_project_summaries() {
    let ws = engine_and_app();
    ws.write(DIRECTIVES, "#ADD_SUBDIRECTORY(\"Engine\")\n");
    let explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();

    assert_eq!(
        explorer.projects().unwrap(),
        vec![
            ProjectSummary {
                name: "App".to_string(),
                project_type: ProjectType::Executable,
                loaded: true,
                listed: false,
            },
            ProjectSummary {
                name: "Engine".to_string(),
                project_type: ProjectType::Library,
                loaded: false,
                listed: true,
            },
        ]
    );
}
