//! Change notification for settings.
//!
//! Listeners fire when `save()` changes a value and when a reload changes
//! the resolved value of a key. Validators run before a save is accepted.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::sync::RwLockExt;
use crate::value::ConfigValue;

/// Callback receiving (`key`, `old_value`, `new_value`).
///
/// `old_value` is `None` when the key had no resolved value before.
pub type ChangeCallback = Arc<dyn Fn(&str, Option<&ConfigValue>, &ConfigValue) + Send + Sync>;

/// Validator invoked before a save is accepted
pub type Validator = Arc<dyn Fn(&ConfigValue) -> Result<(), String> + Send + Sync>;

/// Registry of change listeners and per-key validators.
pub struct EventManager {
    /// Listeners called for every change
    global_listeners: RwLock<Vec<ChangeCallback>>,

    /// Listeners called only for one key
    key_listeners: RwLock<HashMap<String, Vec<ChangeCallback>>>,

    /// Validators per key
    validators: RwLock<HashMap<String, Vec<Validator>>>,
}

impl EventManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_listeners: RwLock::new(Vec::new()),
            key_listeners: RwLock::new(HashMap::new()),
            validators: RwLock::new(HashMap::new()),
        }
    }

    /// Register a listener called for all setting changes.
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str, Option<&ConfigValue>, &ConfigValue) + Send + Sync + 'static,
    {
        self.global_listeners
            .write_recovered()
            .push(Arc::new(callback));
    }

    /// Register a listener for one setting key.
    pub fn watch<F>(&self, key: &str, callback: F)
    where
        F: Fn(&str, Option<&ConfigValue>, &ConfigValue) + Send + Sync + 'static,
    {
        self.key_listeners
            .write_recovered()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Register a validator for one setting key.
    ///
    /// Validators run before a save; the first returned error rejects it.
    pub fn add_validator<F>(&self, key: &str, validator: F)
    where
        F: Fn(&ConfigValue) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators
            .write_recovered()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(validator));
    }

    /// Run the validators registered for `key`.
    ///
    /// # Errors
    ///
    /// Returns the first validator's error message, if any fails.
    pub fn validate(&self, key: &str, value: &ConfigValue) -> Result<(), String> {
        let guard = self.validators.read_recovered();
        if let Some(validators) = guard.get(key) {
            for validator in validators {
                validator(value)?;
            }
        }
        Ok(())
    }

    /// Notify listeners about a change.
    pub fn notify(&self, key: &str, old_value: Option<&ConfigValue>, new_value: &ConfigValue) {
        {
            let guard = self.global_listeners.read_recovered();
            for callback in guard.iter() {
                callback(key, old_value, new_value);
            }
        }

        {
            let guard = self.key_listeners.read_recovered();
            if let Some(listeners) = guard.get(key) {
                for callback in listeners {
                    callback(key, old_value, new_value);
                }
            }
        }
    }

    /// Remove all listeners for one key.
    pub fn unwatch(&self, key: &str) {
        self.key_listeners.write_recovered().remove(key);
    }

    /// Remove every listener.
    pub fn clear(&self) {
        self.global_listeners.write_recovered().clear();
        self.key_listeners.write_recovered().clear();
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_global_listener() {
        let events = EventManager::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        events.on_change(move |_key, _old, _new| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        events.notify("any.key", None, &ConfigValue::Bool(true));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_key_specific_listener() {
        let events = EventManager::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        events.watch("ui.theme", move |_key, _old, _new| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        events.notify(
            "ui.theme",
            Some(&ConfigValue::Str("light".into())),
            &ConfigValue::Str("dark".into()),
        );
        events.notify("general.language", None, &ConfigValue::Str("en".into()));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_validator_rejects() {
        let events = EventManager::new();

        events.add_validator("server.port", |value| {
            match value.as_i64() {
                Some(n) if n > 0 && n <= 65535 => Ok(()),
                _ => Err("port must be between 1 and 65535".into()),
            }
        });

        assert!(events.validate("server.port", &ConfigValue::Int(8080)).is_ok());
        assert!(events.validate("server.port", &ConfigValue::Int(-1)).is_err());
        // Keys without validators always pass
        assert!(events.validate("other", &ConfigValue::Int(-1)).is_ok());
    }
}
