//! Shared test utilities for integration tests
//!
//! Workspace fixtures on a temporary directory, plus serialized access to the environment
//! variables the configuration loader reads.

#![allow(dead_code)]

use cppex::tree::Node;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// A temporary workspace with a root descriptor already in place.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CMakeLists.txt"), "project(Workspace)\n").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `contents` at `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn write_bytes(&self, rel: &str, contents: &[u8]) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn touch(&self, rel: &str) {
        self.write(rel, "");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).unwrap();
    }

    pub fn remove_dir(&self, rel: &str) {
        fs::remove_dir_all(self.path(rel)).unwrap();
    }
}

/// The usual two-project fixture: a library with one class and an executable.
pub fn engine_and_app() -> Workspace {
    let ws = Workspace::new();
    ws.write("Engine/CMakeLists.txt", "add_library(Engine STATIC)\n");
    ws.touch("Engine/include/Math.hpp");
    ws.touch("Engine/src/Math.cpp");
    ws.write("App/CMakeLists.txt", "add_executable(App main.cpp)\n");
    ws.touch("App/main.cpp");
    ws
}

/// Labels of a node's direct children.
pub fn labels(node: &Node) -> Vec<&str> {
    node.children().iter().map(Node::label).collect()
}

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(String, Option<String>)>,
}

impl EnvState {
    fn capture(keys: &[&str]) -> Self {
        Self {
            saved: keys
                .iter()
                .map(|k| (k.to_string(), std::env::var(k).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (key, value) in self.saved {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir` and `vars` set.
///
/// Environment is restored afterwards.
pub fn with_config_env<F, R>(test_dir: &TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

    let mut keys = vec!["HOME", "XDG_CONFIG_HOME"];
    keys.extend(vars.iter().map(|(k, _)| *k));
    let env_state = EnvState::capture(&keys);

    let test_home = test_dir.path().join("home");
    let test_config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&test_home).unwrap();
    std::fs::create_dir_all(&test_config_home).unwrap();

    std::env::set_var("HOME", &test_home);
    std::env::set_var("XDG_CONFIG_HOME", &test_config_home);
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    env_state.restore();

    result
}
