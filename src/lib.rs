//! # confstack - Layered Configuration Store
//!
//! A generic, framework-agnostic Rust library for application settings:
//! ordered sources are merged with later-wins precedence into a typed,
//! read-mostly settings map with optional write-back persistence.
//!
//! ## Features
//!
//! - **Layered Sources**: built-in defaults, JSON/INI/`.env` files, prefixed
//!   environment variables, and explicit overrides - later layers win
//! - **Typed Settings**: register keys with a declared type and default;
//!   raw values are cast exactly once at resolve time
//! - **Constraints**: closed value sets, numeric ranges, regex patterns
//! - **Write-Back**: `save` persists through to a file-backed source with
//!   atomic writes; saving the default keeps the file minimal
//! - **Change Events**: listeners and validators per key or global
//! - **Graceful Fallback**: a missing file is an empty layer, never an
//!   error; malformed content always surfaces
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use confstack::{ConfigStore, FileFormat, SettingSpec, specs};
//! use serde_json::json;
//!
//! let store = ConfigStore::builder("my-app")
//!     .config_dir("~/.config/my-app")
//!     .settings(specs![
//!         SettingSpec::str("ui.theme", "dark").allowed(["light", "dark", "system"]),
//!         SettingSpec::int("server.port", 8080).min(1.0).max(65535.0),
//!         SettingSpec::bool("general.enabled", true),
//!     ])
//!     .defaults([("server.host", json!("127.0.0.1"))])
//!     .file("settings.json", FileFormat::Json)
//!     .env_prefix("MYAPP")
//!     .load()?;
//!
//! let settings = store.accessor();
//! let port: i64 = settings.get_as("server.port")?.unwrap_or(8080);
//! settings.save("ui.theme", "light")?;
//! # Ok::<(), confstack::Error>(())
//! ```
//!
//! ## Precedence
//!
//! Sources apply in the order they are added to the builder, lowest
//! precedence first. The conventional stack reads bottom-up:
//!
//! 1. `defaults(..)` - built-in defaults
//! 2. `file(..)` - one or more config files
//! 3. `env_prefix(..)` - environment variables
//! 4. `overrides(..)` - explicit overrides (e.g. parsed CLI flags)
//!
//! Registered keys absent from every source take the default declared in
//! their [`SettingSpec`]. Keys present in a source but never registered
//! pass through uncast, so arbitrary structured options survive the merge
//! verbatim.
//!
//! ## Lifecycle
//!
//! A store starts **unloaded**; reads fail until the first
//! [`resolve`](ConfigStore::resolve) (or use the builder's
//! [`load`](ConfigStoreBuilder::load) to build and resolve in one step).
//! After that the resolved map is immutable to readers and changes only
//! through [`save`](ConfigAccessor::save) / [`reset`](ConfigAccessor::reset)
//! or an explicit [`reload`](ConfigStore::reload).
//!
//! ## Write-Back Persistence
//!
//! When the store has a file-backed target (the last `file(..)` added, or
//! whatever [`persist_to`](ConfigStoreBuilder::persist_to) names), `save`
//! rewrites it atomically (temp file + rename). Values equal to their
//! registered default are removed from the file rather than written, so
//! persisted files only contain actual customizations and changed defaults
//! apply automatically to users who never touched the setting.

// Core modules
mod accessor;
mod config;
mod error;
mod events;
mod source;
mod store;
mod sync;
mod value;

// Re-exports from core
pub use accessor::ConfigAccessor;
pub use config::{NumberConstraints, SettingSpec, StoreOptions, TextConstraints};
pub use error::{Error, Result};
pub use events::{ChangeCallback, EventManager, Validator};
pub use source::{
    ConfigSource, EnvProvider, EnvSource, FileFormat, FileSource, MemorySource, ProcessEnv,
};
pub use store::{ConfigStore, ConfigStoreBuilder, Origin, Setting, StoreState};
pub use value::{ConfigValue, TypeHint};
