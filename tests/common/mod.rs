//! Common test utilities for confstack integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use confstack::{specs, ConfigStore, FileFormat, SettingSpec};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Standard Registry
// =============================================================================

/// A registry covering every declared type and constraint kind
pub fn standard_specs() -> Vec<SettingSpec> {
    specs![
        SettingSpec::str("ui.theme", "dark").allowed(["light", "dark", "system"]),
        SettingSpec::float("ui.font_size", 14.0).min(8.0).max(32.0),
        SettingSpec::bool("general.enabled", true),
        SettingSpec::str("general.language", "en"),
        SettingSpec::int("server.port", 8080).min(1.0).max(65535.0),
        SettingSpec::json("server.peers", json!([])),
    ]
}

// =============================================================================
// Test Fixture
// =============================================================================

/// Temporary directory plus a resolved store persisting to `settings.json`
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub store: ConfigStore,
}

/// Route crate logs through the test harness (`RUST_LOG=debug cargo test`)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

impl TestFixture {
    /// Store with the standard registry and a JSON settings file
    pub fn new() -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ConfigStore::builder("test-app")
            .config_dir(temp_dir.path())
            .settings(standard_specs())
            .file("settings.json", FileFormat::Json)
            .load()
            .expect("Failed to load store");

        Self { temp_dir, store }
    }

    /// Unresolved store (for lifecycle tests)
    pub fn unloaded() -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ConfigStore::builder("test-app")
            .config_dir(temp_dir.path())
            .settings(standard_specs())
            .file("settings.json", FileFormat::Json)
            .build()
            .expect("Failed to build store");

        Self { temp_dir, store }
    }

    /// Path of the settings file the fixture persists to
    pub fn settings_path(&self) -> PathBuf {
        self.temp_dir.path().join("settings.json")
    }

    /// Overwrite the settings file with raw JSON content
    pub fn write_settings_file(&self, content: &str) {
        std::fs::write(self.settings_path(), content).expect("Failed to write settings file");
    }

    /// Read the raw settings JSON file content, if it exists
    pub fn read_settings_file(&self) -> Option<serde_json::Value> {
        let content = std::fs::read_to_string(self.settings_path()).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
