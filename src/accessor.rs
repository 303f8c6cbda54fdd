//! Application-facing read/write facade.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::store::{ConfigStore, Origin, Setting};
use crate::value::ConfigValue;

/// Cheap read/write handle over a resolved [`ConfigStore`].
///
/// Missing keys are not errors: `get` returns `None` and `get_or` falls
/// back. The only way a read fails is using the store before its first
/// [`resolve`](ConfigStore::resolve).
///
/// # Example
///
/// ```rust,no_run
/// use confstack::{ConfigStore, SettingSpec};
///
/// let store = ConfigStore::builder("my-app")
///     .setting(SettingSpec::bool("general.enabled", true))
///     .load()?;
///
/// let settings = store.accessor();
/// assert!(settings.has("general.enabled")?);
/// assert_eq!(settings.get_as::<bool>("general.enabled")?, Some(true));
///
/// settings.save("general.enabled", false)?;
/// # Ok::<(), confstack::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct ConfigAccessor<'a> {
    store: &'a ConfigStore,
}

impl<'a> ConfigAccessor<'a> {
    pub(crate) fn new(store: &'a ConfigStore) -> Self {
        Self { store }
    }

    /// Get the resolved value for `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first resolve; never
    /// errors for a missing key.
    pub fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        self.store
            .with_settings(|settings| settings.get(key).map(|s| s.value.clone()))
    }

    /// Get the resolved value for `key`, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first resolve.
    pub fn get_or(&self, key: &str, default: impl Into<ConfigValue>) -> Result<ConfigValue> {
        Ok(self.get(key)?.unwrap_or_else(|| default.into()))
    }

    /// Get the resolved value for `key` deserialized into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first resolve, or
    /// [`Error::Config`] when the value does not deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(value) => serde_json::from_value(value.to_json())
                .map(Some)
                .map_err(|e| Error::Config(format!("Cannot deserialize '{key}': {e}"))),
            None => Ok(None),
        }
    }

    /// Whether `key` has a resolved value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first resolve.
    pub fn has(&self, key: &str) -> Result<bool> {
        self.store.with_settings(|settings| settings.contains_key(key))
    }

    /// Where the resolved value of `key` came from, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first resolve.
    pub fn origin(&self, key: &str) -> Result<Option<Origin>> {
        self.store
            .with_settings(|settings| settings.get(key).map(|s| s.origin.clone()))
    }

    /// An ordered copy of the full resolved mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first resolve.
    pub fn snapshot(&self) -> Result<BTreeMap<String, Setting>> {
        self.store.with_settings(Clone::clone)
    }

    /// Save one setting.
    ///
    /// Only registered keys may be written. The value is cast to the key's
    /// declared type, checked against the spec's constraints and any
    /// registered validators, and written through to the persistence file
    /// when one is configured. Saving the registered default removes the
    /// key from the persisted file; an unchanged value skips all I/O.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRegistered`] for unregistered keys,
    /// [`Error::NotInitialized`] before the first resolve,
    /// [`Error::TypeCast`]/[`Error::InvalidValue`] for values that do not
    /// fit the spec, or an I/O error when write-through fails.
    pub fn save(&self, key: &str, value: impl Into<ConfigValue>) -> Result<()> {
        self.store.save_value(key, value.into())
    }

    /// Restore one registered setting to its default, removing it from the
    /// persisted file.
    ///
    /// # Errors
    ///
    /// Same as [`save`](Self::save).
    pub fn reset(&self, key: &str) -> Result<ConfigValue> {
        self.store.reset_value(key)
    }
}
