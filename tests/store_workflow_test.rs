//! Store lifecycle integration tests:
//! - defaults when no source supplies a key
//! - save / persist / reload across store instances
//! - reset behavior and minimal persisted files
//! - the unloaded -> loaded -> reloaded state machine

mod common;

use common::{standard_specs, TestFixture};
use confstack::{ConfigStore, ConfigValue, Error, FileFormat, Origin, StoreState};
use serde_json::json;

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_defaults_apply_when_sources_are_empty() {
    let fixture = TestFixture::new();
    let settings = fixture.store.accessor();

    assert_eq!(
        settings.get("ui.theme").unwrap(),
        Some(ConfigValue::Str("dark".into()))
    );
    assert_eq!(
        settings.get("server.port").unwrap(),
        Some(ConfigValue::Int(8080))
    );
    assert_eq!(settings.get_as::<bool>("general.enabled").unwrap(), Some(true));
    assert_eq!(settings.origin("ui.theme").unwrap(), Some(Origin::Default));
}

#[test]
fn test_missing_key_is_none_not_error() {
    let fixture = TestFixture::new();
    let settings = fixture.store.accessor();

    assert_eq!(settings.get("no.such.key").unwrap(), None);
    assert!(!settings.has("no.such.key").unwrap());
    assert_eq!(
        settings.get_or("no.such.key", 42).unwrap(),
        ConfigValue::Int(42)
    );
}

// =============================================================================
// Save & Persistence
// =============================================================================

#[test]
fn test_save_then_get_roundtrip() {
    let fixture = TestFixture::new();
    let settings = fixture.store.accessor();

    settings.save("ui.theme", "light").unwrap();
    assert_eq!(
        settings.get("ui.theme").unwrap(),
        Some(ConfigValue::Str("light".into()))
    );
    assert_eq!(settings.origin("ui.theme").unwrap(), Some(Origin::Saved));
}

#[test]
fn test_save_persists_across_store_instances() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    // First session: save a value
    {
        let store = ConfigStore::builder("test-app")
            .config_dir(temp_dir.path())
            .settings(standard_specs())
            .file("settings.json", FileFormat::Json)
            .load()
            .unwrap();
        store.accessor().save("server.port", 9000).unwrap();
    }

    // Second session: reload and verify
    {
        let store = ConfigStore::builder("test-app")
            .config_dir(temp_dir.path())
            .settings(standard_specs())
            .file("settings.json", FileFormat::Json)
            .load()
            .unwrap();
        assert_eq!(
            store.accessor().get_as::<i64>("server.port").unwrap(),
            Some(9000)
        );
    }
}

#[test]
fn test_saving_default_removes_key_from_file() {
    let fixture = TestFixture::new();
    let settings = fixture.store.accessor();

    settings.save("ui.theme", "light").unwrap();
    let file = fixture.read_settings_file().unwrap();
    assert_eq!(file.get("ui.theme"), Some(&json!("light")));

    // Back to the default: the key disappears from the persisted file
    settings.save("ui.theme", "dark").unwrap();
    let file = fixture.read_settings_file().unwrap();
    assert_eq!(file.get("ui.theme"), None);

    // The in-memory value still reads back
    assert_eq!(
        settings.get("ui.theme").unwrap(),
        Some(ConfigValue::Str("dark".into()))
    );
}

#[test]
fn test_save_casts_to_declared_type() {
    let fixture = TestFixture::new();
    let settings = fixture.store.accessor();

    // A string that parses as the declared int type is accepted and cast
    settings.save("server.port", "9100").unwrap();
    assert_eq!(
        settings.get("server.port").unwrap(),
        Some(ConfigValue::Int(9100))
    );
}

#[test]
fn test_reset_restores_default() {
    let fixture = TestFixture::new();
    let settings = fixture.store.accessor();

    settings.save("ui.font_size", 20.0).unwrap();
    let default = settings.reset("ui.font_size").unwrap();

    assert_eq!(default, ConfigValue::Float(14.0));
    assert_eq!(
        settings.get("ui.font_size").unwrap(),
        Some(ConfigValue::Float(14.0))
    );
    let file = fixture.read_settings_file().unwrap();
    assert_eq!(file.get("ui.font_size"), None);
}

#[test]
fn test_save_without_persistence_target_stays_in_memory() {
    let store = ConfigStore::builder("test-app")
        .config_dir("/tmp/confstack-nowhere")
        .settings(standard_specs())
        .load()
        .unwrap();

    let settings = store.accessor();
    settings.save("ui.theme", "light").unwrap();
    assert_eq!(
        settings.get("ui.theme").unwrap(),
        Some(ConfigValue::Str("light".into()))
    );
}

// =============================================================================
// State Machine
// =============================================================================

#[test]
fn test_reads_fail_before_first_resolve() {
    let fixture = TestFixture::unloaded();
    let settings = fixture.store.accessor();

    assert_eq!(fixture.store.state(), StoreState::Unloaded);
    assert!(matches!(settings.get("ui.theme"), Err(Error::NotInitialized)));
    assert!(matches!(settings.has("ui.theme"), Err(Error::NotInitialized)));
    assert!(matches!(settings.snapshot(), Err(Error::NotInitialized)));
}

#[test]
fn test_state_transitions() {
    let fixture = TestFixture::unloaded();

    fixture.store.resolve().unwrap();
    assert_eq!(fixture.store.state(), StoreState::Loaded);

    fixture.store.reload().unwrap();
    assert_eq!(fixture.store.state(), StoreState::Reloaded);
}

#[test]
fn test_resolve_is_idempotent() {
    let fixture = TestFixture::new();
    let settings = fixture.store.accessor();

    let first = settings.snapshot().unwrap();
    fixture.store.resolve().unwrap();
    let second = settings.snapshot().unwrap();

    assert_eq!(first, second);
}

// =============================================================================
// Reload
// =============================================================================

#[test]
fn test_reload_picks_up_external_file_changes() {
    let fixture = TestFixture::new();
    let settings = fixture.store.accessor();

    assert_eq!(
        settings.get("general.language").unwrap(),
        Some(ConfigValue::Str("en".into()))
    );

    fixture.write_settings_file(r#"{"general.language": "de"}"#);
    fixture.store.reload().unwrap();

    assert_eq!(
        settings.get("general.language").unwrap(),
        Some(ConfigValue::Str("de".into()))
    );
}

#[test]
fn test_reload_notifies_changed_keys() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let fixture = TestFixture::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    fixture
        .store
        .events()
        .watch("general.language", move |_key, _old, _new| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

    // Unchanged reload: no notification
    fixture.store.reload().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    fixture.write_settings_file(r#"{"general.language": "tr"}"#);
    fixture.store.reload().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Events on Save
// =============================================================================

#[test]
fn test_save_fires_change_listener() {
    use std::sync::Mutex;
    use std::sync::Arc;

    let fixture = TestFixture::new();
    let seen: Arc<Mutex<Vec<(Option<ConfigValue>, ConfigValue)>>> =
        Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();

    fixture.store.events().on_change(move |_key, old, new| {
        seen_clone
            .lock()
            .unwrap()
            .push((old.cloned(), new.clone()));
    });

    let settings = fixture.store.accessor();
    settings.save("ui.theme", "light").unwrap();

    // Saving the same value again is a no-op and fires nothing
    settings.save("ui.theme", "light").unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0],
        (
            Some(ConfigValue::Str("dark".into())),
            ConfigValue::Str("light".into())
        )
    );
}

#[test]
fn test_validator_rejects_save() {
    let fixture = TestFixture::new();

    fixture
        .store
        .events()
        .add_validator("general.language", |value| {
            match value.as_str() {
                Some("en" | "de" | "tr") => Ok(()),
                _ => Err("unsupported language".into()),
            }
        });

    let settings = fixture.store.accessor();
    assert!(settings.save("general.language", "de").is_ok());

    let err = settings.save("general.language", "xx").unwrap_err();
    assert!(matches!(err, Error::InvalidValue { ref key, .. } if key == "general.language"));
}
