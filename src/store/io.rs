//! Write path: saving and resetting settings.

use log::{debug, info};

use crate::error::{Error, Result};
use crate::source::ConfigSource;
use crate::store::core::{ConfigStore, Origin, Setting};
use crate::sync::RwLockExt;
use crate::value::ConfigValue;

impl ConfigStore {
    /// Save one setting value.
    ///
    /// The value is cast to the key's declared type, checked against the
    /// spec's constraints and any registered validators, applied to the
    /// in-memory map, and written through to the persistence file when one
    /// is configured. Saving the registered default removes the key from
    /// the persisted file, keeping it minimal; an unchanged value skips all
    /// I/O. Change listeners fire after a successful save.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRegistered`] when `key` was never registered,
    /// [`Error::NotInitialized`] before the first `resolve()`,
    /// [`Error::TypeCast`]/[`Error::InvalidValue`] when the value does not
    /// fit the spec, or an I/O error variant when write-through fails.
    pub(crate) fn save_value(&self, key: &str, value: ConfigValue) -> Result<()> {
        let spec = self
            .registry
            .get(key)
            .ok_or_else(|| Error::NotRegistered(key.to_string()))?;

        let cast = ConfigValue::cast(key, &value.to_json(), spec.hint)?;
        spec.validate(&cast)?;
        self.events
            .validate(key, &cast)
            .map_err(|reason| Error::InvalidValue {
                key: key.to_string(),
                reason,
            })?;

        let old_value = self.with_settings(|settings| {
            settings.get(key).map(|setting| setting.value.clone())
        })?;

        if old_value.as_ref() == Some(&cast) {
            debug!("Setting {key} unchanged, skipping save");
            return Ok(());
        }

        // Write through before touching the in-memory map, so a failed
        // write leaves readers seeing the old value.
        if let Some(persist) = &self.persist {
            let mut stored = persist.load()?;
            if cast == spec.default {
                stored.remove(key);
                debug!(
                    "Setting {key} set to default, removed from {}",
                    persist.path().display()
                );
            } else {
                stored.insert(key.to_string(), cast.to_json());
            }
            persist.persist(&stored, self.options.pretty_json)?;
        }

        {
            let mut guard = self.state.write_recovered();
            let state = guard.as_mut().ok_or(Error::NotInitialized)?;
            state.settings.insert(
                key.to_string(),
                Setting {
                    key: key.to_string(),
                    value: cast.clone(),
                    origin: Origin::Saved,
                },
            );
        }

        info!("Setting {key} saved");
        self.events.notify(key, old_value.as_ref(), &cast);
        Ok(())
    }

    /// Restore one registered setting to its default.
    pub(crate) fn reset_value(&self, key: &str) -> Result<ConfigValue> {
        let default = self
            .registry
            .get(key)
            .map(|spec| spec.default.clone())
            .ok_or_else(|| Error::NotRegistered(key.to_string()))?;

        self.save_value(key, default.clone())?;

        info!("Setting {key} reset to default");
        Ok(default)
    }
}
