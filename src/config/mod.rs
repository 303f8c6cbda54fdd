//! Setting registration and store options.
//!
//! - [`SettingSpec`] - per-setting declaration (type hint, default, constraints)
//! - [`StoreOptions`] - store-level options (app name, config directory)

mod schema;
mod types;

pub use schema::{NumberConstraints, SettingSpec, TextConstraints};
pub use types::StoreOptions;
