//! Integration tests for generated headers and source lists

use crate::integration::test_utils::{engine_and_app, labels};
use cppex::config::ExplorerConfig;
use cppex::explorer::{Explorer, NullSink};
use cppex::tree::NodeKind;

const OPTIONS: &str = "Engine/CppExplorerOptions.cmake";

#[test]
fn test_source_lists_written_per_project() {
    let ws = engine_and_app();
    ws.touch("Engine/src/core/Vec.cpp");
    let mut explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();
    explorer.refresh(&mut NullSink).unwrap();

    assert_eq!(
        ws.read("Engine/SourceFiles.cmake"),
        "set(SourceFiles \nsrc/Math.cpp\nsrc/core/Vec.cpp\n)"
    );
    assert_eq!(ws.read("App/SourceFiles.cmake"), "set(SourceFiles \nmain.cpp\n)");
}

#[test]
fn test_umbrella_header_follows_option() {
    let ws = engine_and_app();
    ws.write(OPTIONS, "OPTION(CppEx_AutoGenCombinedLibraryHeader \"umbrella\" ON)\n");
    let mut explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();
    explorer.refresh(&mut NullSink).unwrap();

    assert_eq!(
        ws.read("Engine/Engine.hpp"),
        "#ifndef ENGINE_HPP\n#define ENGINE_HPP\n\n    #include \"include/Math.hpp\"\n\n\
         #endif //ENGINE_HPP\n"
    );
    assert!(!ws.exists("App/App.hpp"));
}

#[test]
fn test_internal_keyword_header_generated_and_included() {
    let ws = engine_and_app();
    ws.write(
        OPTIONS,
        "OPTION(CppEx_AutoGenCombinedLibraryHeader \"umbrella\" ON)\n\
         OPTION(CppEx_EnableInternalKeyword \"internal\" ON)\n",
    );
    let mut explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();
    explorer.refresh(&mut NullSink).unwrap();

    let internal = ws.read("Engine/include/InternalKeyword.hpp");
    assert!(internal.contains("#ifndef ENGINEINTERNAL"));

    let umbrella = ws.read("Engine/Engine.hpp");
    assert!(umbrella.contains("    #define ENGINEINTERNAL\n"));
    let internal_at = umbrella.find("include/InternalKeyword.hpp").unwrap();
    let math_at = umbrella.find("include/Math.hpp").unwrap();
    assert!(internal_at < math_at);

    // Generated files show up in the tree after the refresh that wrote them.
    let engine = explorer.roots()[0].child("Engine").unwrap();
    assert!(labels(engine).contains(&"InternalKeyword.hpp"));
    assert_eq!(engine.child("Engine.hpp").unwrap().kind(), NodeKind::Header);
}

#[test]
fn test_artifacts_rewritten_only_on_change() {
    let ws = engine_and_app();
    ws.write(OPTIONS, "OPTION(CppEx_AutoGenCombinedLibraryHeader \"umbrella\" ON)\n");
    let mut explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();

    let first = explorer.refresh(&mut NullSink).unwrap();
    assert!(!first.written.is_empty());
    let second = explorer.refresh(&mut NullSink).unwrap();
    assert!(second.written.is_empty());
    assert!(second.write_failures.is_empty());

    ws.touch("Engine/include/Vec.hpp");
    let third = explorer.refresh(&mut NullSink).unwrap();
    assert!(third.written.iter().any(|p| p.ends_with("Engine/Engine.hpp")));
    assert!(ws.read("Engine/Engine.hpp").contains("#include \"include/Vec.hpp\""));
}

#[test]
fn test_unloaded_project_gets_no_headers() {
    let ws = engine_and_app();
    ws.write(OPTIONS, "OPTION(CppEx_AutoGenCombinedLibraryHeader \"umbrella\" ON)\n");
    ws.write("CppExplorerProjects.cmake", "#ADD_SUBDIRECTORY(\"Engine\")\n");
    let mut explorer = Explorer::open(ws.root(), ExplorerConfig::default()).unwrap();
    explorer.refresh(&mut NullSink).unwrap();

    assert!(!ws.exists("Engine/Engine.hpp"));
}
