//! The precedence-resolving settings store.
//!
//! Split across focused submodules:
//! - `core` - the [`ConfigStore`] type and resolved-state model
//! - `builder` - fluent construction
//! - `resolve` - source merging and reads
//! - `io` - the save/reset write path

mod builder;
mod core;
mod io;
mod resolve;

pub use builder::ConfigStoreBuilder;
pub use core::{ConfigStore, Origin, Setting, StoreState};
