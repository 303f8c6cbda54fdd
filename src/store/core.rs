//! The `ConfigStore` type and its resolved-state model.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::config::{SettingSpec, StoreOptions};
use crate::events::EventManager;
use crate::source::{ConfigSource, FileSource};
use crate::sync::RwLockExt;
use crate::value::ConfigValue;

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// No source supplied the key; the registered default applies
    Default,
    /// Supplied by the named source
    Source(String),
    /// Written through the accessor after resolution
    Saved,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Default => write!(f, "default"),
            Origin::Source(name) => write!(f, "{name}"),
            Origin::Saved => write!(f, "saved"),
        }
    }
}

/// One resolved setting: key, typed value, and provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: ConfigValue,
    pub origin: Origin,
}

/// Lifecycle state of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// `resolve()` has not run yet; reads fail
    Unloaded,
    /// First `resolve()` completed
    Loaded,
    /// At least one re-resolve completed
    Reloaded,
}

pub(crate) struct ResolvedState {
    pub settings: BTreeMap<String, Setting>,
    pub generation: u64,
}

/// Merged, precedence-resolved settings for one application.
///
/// Built with [`ConfigStore::builder`]; sources are read and merged by
/// [`resolve`](ConfigStore::resolve), after which readers access the result
/// through [`accessor`](ConfigStore::accessor). The resolved map is
/// immutable to readers; it changes only through an explicit
/// `save`/`reset`/`reload`.
///
/// # Example
///
/// ```rust,no_run
/// use confstack::{ConfigStore, FileFormat, SettingSpec};
///
/// let store = ConfigStore::builder("my-app")
///     .setting(SettingSpec::str("ui.theme", "dark").allowed(["light", "dark"]))
///     .setting(SettingSpec::int("server.port", 8080))
///     .file("settings.json", FileFormat::Json)
///     .env_prefix("MYAPP")
///     .load()?;
///
/// let settings = store.accessor();
/// let port = settings.get_or("server.port", 8080)?;
/// # Ok::<(), confstack::Error>(())
/// ```
pub struct ConfigStore {
    /// Store-level options
    pub(crate) options: StoreOptions,

    /// Registered specs, keyed by setting key
    pub(crate) registry: BTreeMap<String, SettingSpec>,

    /// Sources in merge order (lowest precedence first)
    pub(crate) sources: Vec<Box<dyn ConfigSource>>,

    /// Write-back target for `save`/`reset`, when one is configured
    pub(crate) persist: Option<FileSource>,

    /// Resolved settings; `None` until the first `resolve()`
    pub(crate) state: RwLock<Option<ResolvedState>>,

    /// Change listeners and validators
    pub(crate) events: Arc<EventManager>,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("options", &self.options)
            .field("registry", &self.registry)
            .field("sources", &self.sources.len())
            .field("persist", &self.persist)
            .field("state", &"..")
            .field("events", &"..")
            .finish()
    }
}

impl ConfigStore {
    pub(crate) fn new(
        options: StoreOptions,
        registry: BTreeMap<String, SettingSpec>,
        sources: Vec<Box<dyn ConfigSource>>,
        persist: Option<FileSource>,
    ) -> Self {
        log::info!(
            "Initialized config store for '{}' with {} sources, {} registered settings",
            options.app_name,
            sources.len(),
            registry.len()
        );

        Self {
            options,
            registry,
            sources,
            persist,
            state: RwLock::new(None),
            events: Arc::new(EventManager::new()),
        }
    }

    /// Create a builder for a `ConfigStore`.
    pub fn builder(app_name: impl Into<String>) -> crate::store::ConfigStoreBuilder {
        crate::store::ConfigStoreBuilder::new(app_name)
    }

    /// Store-level options
    #[must_use]
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// The registered spec for `key`, if any
    #[must_use]
    pub fn spec(&self, key: &str) -> Option<&SettingSpec> {
        self.registry.get(key)
    }

    /// Lifecycle state of this store
    #[must_use]
    pub fn state(&self) -> StoreState {
        let guard = self.state.read_recovered();
        match guard.as_ref() {
            None => StoreState::Unloaded,
            Some(state) if state.generation <= 1 => StoreState::Loaded,
            Some(_) => StoreState::Reloaded,
        }
    }

    /// The event manager for registering change listeners and validators.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # let store = confstack::ConfigStore::builder("my-app").load()?;
    /// store.events().watch("ui.theme", |key, _old, new| {
    ///     println!("{key} changed to {new}");
    /// });
    /// # Ok::<(), confstack::Error>(())
    /// ```
    #[must_use]
    pub fn events(&self) -> &Arc<EventManager> {
        &self.events
    }

    /// The read/write facade for application code.
    #[must_use]
    pub fn accessor(&self) -> crate::accessor::ConfigAccessor<'_> {
        crate::accessor::ConfigAccessor::new(self)
    }
}
