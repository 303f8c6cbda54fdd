//! Edge cases:
//! - malformed source content
//! - writes to unregistered keys
//! - empty stores and empty files
//! - quoted and commented line-format content

mod common;

use common::{standard_specs, TestFixture};
use confstack::{ConfigStore, ConfigValue, Error, FileFormat, MemorySource, SettingSpec};
use serde_json::json;

// =============================================================================
// Malformed Content
// =============================================================================

#[test]
fn test_malformed_json_fails_load() {
    let fixture = TestFixture::unloaded();
    fixture.write_settings_file("{not valid json");

    let err = fixture.store.resolve().unwrap_err();
    assert!(err.is_parse());
}

#[test]
fn test_malformed_ini_names_line() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.ini"),
        "valid = 1\nthis line has no equals sign\n",
    )
    .unwrap();

    let err = ConfigStore::builder("test-app")
        .config_dir(dir.path())
        .file("settings.ini", FileFormat::Ini)
        .load()
        .unwrap_err();

    match err {
        Error::Parse { line, .. } => assert_eq!(line, Some(2)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_json_array_at_top_level_rejected() {
    let fixture = TestFixture::unloaded();
    fixture.write_settings_file("[1, 2, 3]");

    assert!(fixture.store.resolve().unwrap_err().is_parse());
}

// =============================================================================
// Unregistered Writes
// =============================================================================

#[test]
fn test_save_unregistered_key_rejected() {
    let fixture = TestFixture::new();

    let err = fixture
        .store
        .accessor()
        .save("unregistered_key", 5)
        .unwrap_err();

    assert!(matches!(err, Error::NotRegistered(ref key) if key == "unregistered_key"));
}

#[test]
fn test_pass_through_keys_are_still_unwritable() {
    // A key supplied by a source but never registered can be read, not saved
    let store = ConfigStore::builder("test-app")
        .config_dir("/tmp/test-app")
        .source(MemorySource::new("literal", [("custom.flag", json!("on"))]))
        .load()
        .unwrap();

    let settings = store.accessor();
    assert!(settings.has("custom.flag").unwrap());
    assert!(matches!(
        settings.save("custom.flag", "off"),
        Err(Error::NotRegistered(_))
    ));
}

#[test]
fn test_reset_unregistered_key_rejected() {
    let fixture = TestFixture::new();
    assert!(matches!(
        fixture.store.accessor().reset("nope"),
        Err(Error::NotRegistered(_))
    ));
}

// =============================================================================
// Empty Inputs
// =============================================================================

#[test]
fn test_store_with_no_sources_resolves_registry_defaults() {
    let store = ConfigStore::builder("test-app")
        .config_dir("/tmp/test-app")
        .settings(standard_specs())
        .load()
        .unwrap();

    let snapshot = store.accessor().snapshot().unwrap();
    assert_eq!(snapshot.len(), standard_specs().len());
}

#[test]
fn test_completely_empty_store() {
    let store = ConfigStore::builder("test-app")
        .config_dir("/tmp/test-app")
        .load()
        .unwrap();

    let settings = store.accessor();
    assert!(settings.snapshot().unwrap().is_empty());
    assert_eq!(settings.get("anything").unwrap(), None);
}

#[test]
fn test_empty_json_object_file() {
    let fixture = TestFixture::unloaded();
    fixture.write_settings_file("{}");

    fixture.store.resolve().unwrap();
    assert_eq!(
        fixture.store.accessor().get_as::<i64>("server.port").unwrap(),
        Some(8080)
    );
}

// =============================================================================
// Line-Format Quirks
// =============================================================================

#[test]
fn test_ini_quotes_and_comments() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.ini"),
        "; leading comment\n# another comment\n[general]\nlanguage = 'de'\n\n[ui]\ntheme = system\n",
    )
    .unwrap();

    let store = ConfigStore::builder("test-app")
        .config_dir(dir.path())
        .settings(standard_specs())
        .file("settings.ini", FileFormat::Ini)
        .load()
        .unwrap();

    let settings = store.accessor();
    assert_eq!(settings.get_as::<String>("general.language").unwrap().unwrap(), "de");
    assert_eq!(settings.get_as::<String>("ui.theme").unwrap().unwrap(), "system");
}

#[test]
fn test_env_file_quoted_values_keep_spaces() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("app.env"),
        "GENERAL_LANGUAGE=\"en\"\nCUSTOM_GREETING='hello there'\n",
    )
    .unwrap();

    let store = ConfigStore::builder("test-app")
        .config_dir(dir.path())
        .settings(standard_specs())
        .file("app.env", FileFormat::EnvFile)
        .load()
        .unwrap();

    let settings = store.accessor();
    assert_eq!(settings.get_as::<String>("general.language").unwrap().unwrap(), "en");
    assert_eq!(
        settings.get("custom.greeting").unwrap(),
        Some(ConfigValue::Str("hello there".into()))
    );
}

// =============================================================================
// Persistence Formats
// =============================================================================

#[test]
fn test_save_persists_through_ini_target() {
    let dir = tempfile::TempDir::new().unwrap();

    {
        let store = ConfigStore::builder("test-app")
            .config_dir(dir.path())
            .settings(standard_specs())
            .file("settings.ini", FileFormat::Ini)
            .load()
            .unwrap();
        store.accessor().save("server.port", 9400).unwrap();
    }

    // The INI file round-trips through a fresh store
    {
        let store = ConfigStore::builder("test-app")
            .config_dir(dir.path())
            .settings(standard_specs())
            .file("settings.ini", FileFormat::Ini)
            .load()
            .unwrap();
        assert_eq!(
            store.accessor().get_as::<i64>("server.port").unwrap(),
            Some(9400)
        );
    }
}

#[test]
fn test_spec_keys_survive_snapshot_ordering() {
    // BTreeMap keeps the resolved mapping deterministically ordered
    let store = ConfigStore::builder("test-app")
        .config_dir("/tmp/test-app")
        .setting(SettingSpec::int("b", 2))
        .setting(SettingSpec::int("a", 1))
        .setting(SettingSpec::int("c", 3))
        .load()
        .unwrap();

    let keys: Vec<String> = store.accessor().snapshot().unwrap().into_keys().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}
