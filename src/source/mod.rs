//! Configuration sources.
//!
//! A source produces a flat map of raw key/value pairs from one origin.
//! Sources carry no precedence themselves; the order they are handed to the
//! store decides who wins on conflicting keys (later wins).

mod env;
mod file;
mod format;
mod memory;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::Result;

pub use env::{EnvProvider, EnvSource, ProcessEnv};
pub use file::FileSource;
pub use format::FileFormat;
pub use memory::MemorySource;

/// One origin of raw configuration key/value pairs.
///
/// Implement this to feed the store from custom origins (a database, a
/// remote service, a CLI argument parser). The built-in implementations
/// cover files ([`FileSource`]), the process environment ([`EnvSource`])
/// and literal maps ([`MemorySource`]).
pub trait ConfigSource: Send + Sync {
    /// Human-readable name, used for origin tracking and logging
    fn name(&self) -> &str;

    /// Load the raw key map.
    ///
    /// A missing origin (e.g. an absent file) is a designed fallback path
    /// and returns an empty map. Malformed content is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) on malformed content,
    /// or an I/O error variant when the origin exists but cannot be read.
    fn load(&self) -> Result<BTreeMap<String, Value>>;
}
