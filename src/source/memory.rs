//! In-memory configuration source.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::Result;
use crate::source::ConfigSource;

/// A configuration source holding a literal map fixed at construction.
///
/// Used for built-in defaults (lowest precedence) and explicit overrides
/// (highest precedence), or anywhere a caller already has values in hand.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    values: BTreeMap<String, Value>,
}

impl MemorySource {
    /// Create a named source from anything yielding key/value pairs.
    pub fn new(
        name: impl Into<String>,
        values: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Self {
        Self {
            name: name.into(),
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Number of values this source carries
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<BTreeMap<String, Value>> {
        Ok(self.values.clone())
    }
}
