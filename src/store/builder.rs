//! Builder for [`ConfigStore`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;

use crate::config::{SettingSpec, StoreOptions};
use crate::error::{Error, Result};
use crate::source::{ConfigSource, EnvSource, FileFormat, FileSource, MemorySource};
use crate::store::core::ConfigStore;

/// Pending source layer; file paths resolve against the config directory at
/// build time, so `.config_dir(..)` may come before or after `.file(..)`.
enum Layer {
    Ready(Box<dyn ConfigSource>),
    File { path: PathBuf, format: FileFormat },
}

/// Fluent builder for a [`ConfigStore`].
///
/// Sources are merged in the order they are added, lowest precedence first:
/// add built-in defaults first, then files, then the environment, then
/// explicit overrides.
///
/// # Example
///
/// ```rust,no_run
/// use confstack::{ConfigStore, FileFormat, SettingSpec, specs};
/// use serde_json::json;
///
/// let store = ConfigStore::builder("my-app")
///     .config_dir("~/.config/my-app")
///     .settings(specs![
///         SettingSpec::bool("general.enabled", true),
///         SettingSpec::int("server.port", 8080).min(1.0).max(65535.0),
///     ])
///     .defaults([("server.host", json!("127.0.0.1"))])
///     .file("settings.json", FileFormat::Json)
///     .env_prefix("MYAPP")
///     .load()?;
/// # Ok::<(), confstack::Error>(())
/// ```
pub struct ConfigStoreBuilder {
    app_name: String,
    config_dir: Option<PathBuf>,
    pretty_json: bool,
    registry: Vec<SettingSpec>,
    layers: Vec<Layer>,
    persist_to: Option<(PathBuf, FileFormat)>,
}

impl ConfigStoreBuilder {
    /// Create a new builder with the required app name.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            config_dir: None,
            pretty_json: true,
            registry: Vec::new(),
            layers: Vec::new(),
            persist_to: None,
        }
    }

    /// Set the configuration directory.
    ///
    /// Relative file sources and the persistence target resolve against it.
    /// Supports `~` expansion; defaults to the per-app system config
    /// directory.
    #[must_use]
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(path.into());
        self
    }

    /// Use compact JSON when persisting (default is pretty-printed).
    #[must_use]
    pub fn compact_json(mut self) -> Self {
        self.pretty_json = false;
        self
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register one setting.
    #[must_use]
    pub fn setting(mut self, spec: SettingSpec) -> Self {
        self.registry.push(spec);
        self
    }

    /// Register several settings at once (pairs well with [`specs!`](crate::specs)).
    #[must_use]
    pub fn settings(mut self, specs: impl IntoIterator<Item = SettingSpec>) -> Self {
        self.registry.extend(specs);
        self
    }

    // =========================================================================
    // Source layers (lowest precedence first)
    // =========================================================================

    /// Add an arbitrary source as the next (higher-precedence) layer.
    #[must_use]
    pub fn source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.layers.push(Layer::Ready(Box::new(source)));
        self
    }

    /// Add a literal map of built-in defaults as the next layer.
    ///
    /// Conventionally the first layer added, so every other source
    /// overrides it.
    #[must_use]
    pub fn defaults(
        mut self,
        values: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Self {
        self.layers
            .push(Layer::Ready(Box::new(MemorySource::new("defaults", values))));
        self
    }

    /// Add a file source as the next layer.
    ///
    /// Relative paths resolve against the config directory. A missing file
    /// is an empty layer, not an error. The last file added becomes the
    /// write-back target for `save`/`reset` unless
    /// [`persist_to`](Self::persist_to) names one explicitly.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>, format: FileFormat) -> Self {
        self.layers.push(Layer::File {
            path: path.into(),
            format,
        });
        self
    }

    /// Add an environment variable source as the next layer.
    ///
    /// With prefix `MYAPP`, the variable `MYAPP_SERVER_PORT` supplies the
    /// key `server.port`.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.layers
            .push(Layer::Ready(Box::new(EnvSource::new(prefix))));
        self
    }

    /// Add a literal map of explicit overrides as the next layer.
    ///
    /// Conventionally the last layer added (e.g. parsed CLI flags), so it
    /// wins over every other source.
    #[must_use]
    pub fn overrides(
        mut self,
        values: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Self {
        self.layers
            .push(Layer::Ready(Box::new(MemorySource::new("overrides", values))));
        self
    }

    /// Name the file `save`/`reset` write through to.
    ///
    /// Overrides the default choice (the last file source added). The
    /// format must be writable; TOML and YAML sources are read-only.
    #[must_use]
    pub fn persist_to(mut self, path: impl Into<PathBuf>, format: FileFormat) -> Self {
        self.persist_to = Some((path.into(), format));
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Build the store without resolving it.
    ///
    /// The store starts unloaded; call [`resolve`](ConfigStore::resolve)
    /// before reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpec`] for malformed or duplicate
    /// registrations, or [`Error::Config`] for an unwritable persistence
    /// target.
    pub fn build(self) -> Result<ConfigStore> {
        let options = StoreOptions {
            config_dir: StoreOptions::resolve_config_dir(&self.app_name, self.config_dir),
            app_name: self.app_name,
            pretty_json: self.pretty_json,
        };

        let mut registry = BTreeMap::new();
        for spec in self.registry {
            spec.validate_spec()?;
            let key = spec.key.clone();
            if registry.insert(key.clone(), spec).is_some() {
                return Err(Error::InvalidSpec {
                    key,
                    reason: "registered more than once".into(),
                });
            }
        }

        let mut sources: Vec<Box<dyn ConfigSource>> = Vec::with_capacity(self.layers.len());
        let mut last_file: Option<FileSource> = None;
        for layer in self.layers {
            match layer {
                Layer::Ready(source) => sources.push(source),
                Layer::File { path, format } => {
                    let file = FileSource::new(options.resolve_path(path), format);
                    if format.is_writable() {
                        last_file = Some(file.clone());
                    }
                    sources.push(Box::new(file));
                }
            }
        }

        let persist = match self.persist_to {
            Some((path, format)) => {
                if !format.is_writable() {
                    return Err(Error::Config(format!(
                        "Persistence target '{}' uses a read-only format",
                        path.display()
                    )));
                }
                Some(FileSource::new(options.resolve_path(path), format))
            }
            None => last_file,
        };

        Ok(ConfigStore::new(options, registry, sources, persist))
    }

    /// Build the store and run the first [`resolve`](ConfigStore::resolve).
    ///
    /// # Errors
    ///
    /// Propagates build errors plus any parse/cast/constraint error from
    /// the first resolve.
    pub fn load(self) -> Result<ConfigStore> {
        let store = self.build()?;
        store.resolve()?;
        Ok(store)
    }
}

// =============================================================================
// Tests
// =============================================================================
