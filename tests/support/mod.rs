//! Test support utilities for ansibase integration tests.
//!
//! Provides isolated test environments and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use tempfile::TempDir;

/// Test environment with an isolated temp directory.
///
/// Child processes run with `.current_dir()` set to the temp dir and with
/// every `ANSIBASE_*` variable cleared, so tests can run in parallel.
pub struct Test {
    /// Directory holding ansibase.toml and the database
    pub dir: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a test environment with config and database initialized.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.init_cmd();
        assert!(
            output.status.success(),
            "Failed to initialize: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Initialized environment with a group document imported.
    pub fn with_groups(document: &str) -> Self {
        let t = Self::init();
        let output = t.import_groups(document, &[]);
        assert!(
            output.status.success(),
            "Failed to import: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Path of a file inside the test directory.
    pub fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}
