//! Source merging and resolved-state reads.

use std::collections::BTreeMap;

use log::{debug, info};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::source::ConfigSource;
use crate::store::core::{ConfigStore, Origin, ResolvedState, Setting};
use crate::sync::RwLockExt;
use crate::value::ConfigValue;

impl ConfigStore {
    /// Read all sources and merge them into the resolved settings map.
    ///
    /// Sources apply in the order they were added to the builder; a later
    /// source wins on conflicting keys. Registered keys are cast to their
    /// declared type and checked against their constraints; registered keys
    /// absent from every source take their default. Keys no spec was
    /// registered for pass through uncast.
    ///
    /// Resolving is idempotent: with unchanged sources, repeated calls
    /// produce an identical map. On a re-resolve, change listeners fire for
    /// every key whose value differs from the previous resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] or an I/O error variant from a source,
    /// [`Error::TypeCast`] when a raw value cannot be cast to its declared
    /// type, or [`Error::InvalidValue`] when a cast value violates its
    /// spec's constraints.
    pub fn resolve(&self) -> Result<()> {
        let mut raw: BTreeMap<String, (Value, String)> = BTreeMap::new();
        for source in &self.sources {
            let map = source.load()?;
            debug!("Source {} supplied {} keys", source.name(), map.len());
            for (key, value) in map {
                raw.insert(key, (value, source.name().to_string()));
            }
        }

        let mut settings = BTreeMap::new();
        for (key, spec) in &self.registry {
            let setting = match raw.remove(key) {
                Some((value, origin)) => {
                    let cast = ConfigValue::cast(key, &value, spec.hint)?;
                    spec.validate(&cast)?;
                    Setting {
                        key: key.clone(),
                        value: cast,
                        origin: Origin::Source(origin),
                    }
                }
                None => Setting {
                    key: key.clone(),
                    value: spec.default.clone(),
                    origin: Origin::Default,
                },
            };
            settings.insert(key.clone(), setting);
        }

        // Unregistered keys pass through without casting
        for (key, (value, origin)) in raw {
            settings.insert(
                key.clone(),
                Setting {
                    key,
                    value: ConfigValue::passthrough(value),
                    origin: Origin::Source(origin),
                },
            );
        }

        info!(
            "Resolved {} settings from {} sources",
            settings.len(),
            self.sources.len()
        );

        // Swap the new state in, collecting change notifications to fire
        // after the lock is released.
        let mut changes: Vec<(String, Option<ConfigValue>, ConfigValue)> = Vec::new();
        {
            let mut guard = self.state.write_recovered();
            let generation = guard.as_ref().map_or(0, |s| s.generation) + 1;
            if let Some(previous) = guard.as_ref() {
                for (key, setting) in &settings {
                    let old = previous.settings.get(key).map(|s| &s.value);
                    if old != Some(&setting.value) {
                        changes.push((key.clone(), old.cloned(), setting.value.clone()));
                    }
                }
            }
            *guard = Some(ResolvedState {
                settings,
                generation,
            });
        }

        for (key, old, new) in &changes {
            self.events.notify(key, old.as_ref(), new);
        }

        Ok(())
    }

    /// Re-run the merge against the current source contents.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve).
    pub fn reload(&self) -> Result<()> {
        info!("Reloading settings for '{}'", self.options.app_name);
        self.resolve()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Run `f` against the resolved map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the first `resolve()`.
    pub(crate) fn with_settings<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&BTreeMap<String, Setting>) -> R,
    {
        let guard = self.state.read_recovered();
        match guard.as_ref() {
            Some(state) => Ok(f(&state.settings)),
            None => Err(Error::NotInitialized),
        }
    }
}
