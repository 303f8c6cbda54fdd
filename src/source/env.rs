//! Environment variable configuration source.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::error::Result;
use crate::source::format::logical_env_key;
use crate::source::ConfigSource;

/// Access to environment variables, injectable for tests.
///
/// The default implementation reads the process environment. Tests supply a
/// fixed map instead of mutating process state.
pub trait EnvProvider: Send + Sync {
    /// All variables visible to this provider
    fn vars(&self) -> Vec<(String, String)>;
}

/// [`EnvProvider`] backed by the process environment
#[derive(Debug, Clone, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars().collect()
    }
}

impl EnvProvider for BTreeMap<String, String> {
    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// A configuration source reading prefixed environment variables.
///
/// Variables named `{PREFIX}_{KEY}` map to logical keys by dropping the
/// prefix, lowercasing, and turning `_` into `.` - so with prefix `MYAPP`,
/// `MYAPP_SERVER_PORT=9000` supplies key `server.port`. This is the exact
/// inverse of the conventional `{PREFIX}_{CATEGORY}_{KEY}` spelling of
/// dotted setting keys.
///
/// Values are always raw strings; registered keys are cast at resolve time.
pub struct EnvSource {
    prefix: String,
    provider: Arc<dyn EnvProvider>,
    name: String,
}

impl EnvSource {
    /// Create a source scanning the process environment for `PREFIX_*`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_provider(prefix, Arc::new(ProcessEnv))
    }

    /// Create a source with a custom [`EnvProvider`].
    pub fn with_provider(prefix: impl Into<String>, provider: Arc<dyn EnvProvider>) -> Self {
        let prefix = prefix.into().to_uppercase();
        let name = format!("env:{prefix}");
        Self {
            prefix,
            provider,
            name,
        }
    }

    /// The uppercase variable prefix this source scans for
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl ConfigSource for EnvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<BTreeMap<String, Value>> {
        let marker = format!("{}_", self.prefix);
        let mut map = BTreeMap::new();

        for (var, value) in self.provider.vars() {
            if let Some(suffix) = var.strip_prefix(&marker) {
                if suffix.is_empty() {
                    continue;
                }
                let key = logical_env_key(suffix);
                debug!("Env override {var} -> {key}");
                map.insert(key, Value::String(value));
            }
        }

        Ok(map)
    }
}

// =============================================================================
// Tests
// =============================================================================
