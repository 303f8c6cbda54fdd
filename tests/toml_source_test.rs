//! TOML file source integration tests (requires the `toml` feature).

mod common;

use common::standard_specs;
use confstack::{ConfigStore, ConfigValue, Error, FileFormat};

#[test]
fn test_toml_tables_become_structured_values() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.toml"),
        "\"general.language\" = \"de\"\n\n[limits]\nretries = 3\n",
    )
    .unwrap();

    let store = ConfigStore::builder("test-app")
        .config_dir(dir.path())
        .settings(standard_specs())
        .file("settings.toml", FileFormat::Toml)
        .load()
        .unwrap();

    let settings = store.accessor();
    assert_eq!(
        settings.get_as::<String>("general.language").unwrap().unwrap(),
        "de"
    );
    // The [limits] table passes through as one structured value
    assert_eq!(
        settings.get("limits").unwrap(),
        Some(ConfigValue::Json(serde_json::json!({"retries": 3})))
    );
}

#[test]
fn test_malformed_toml_fails_load() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.toml"), "key = [unclosed\n").unwrap();

    let err = ConfigStore::builder("test-app")
        .config_dir(dir.path())
        .file("settings.toml", FileFormat::Toml)
        .load()
        .unwrap_err();

    assert!(err.is_parse());
}

#[test]
fn test_toml_target_is_not_writable() {
    let dir = tempfile::TempDir::new().unwrap();

    let err = ConfigStore::builder("test-app")
        .config_dir(dir.path())
        .persist_to("settings.toml", FileFormat::Toml)
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_toml_layer_never_becomes_implicit_persist_target() {
    let dir = tempfile::TempDir::new().unwrap();

    // Read-only TOML layered over a writable JSON file: saves go to JSON
    let store = ConfigStore::builder("test-app")
        .config_dir(dir.path())
        .settings(standard_specs())
        .file("user.json", FileFormat::Json)
        .file("site.toml", FileFormat::Toml)
        .load()
        .unwrap();

    store.accessor().save("server.port", 9500).unwrap();
    assert!(dir.path().join("user.json").exists());
    assert!(!dir.path().join("site.toml").exists());
}
