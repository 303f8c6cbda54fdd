//! Resolved setting values and declared-type casting.
//!
//! Raw source data arrives as `serde_json::Value` (files may carry native
//! types, env vars carry strings). Registered keys are cast exactly once at
//! resolve time into a [`ConfigValue`]; readers never re-infer types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Declared type for a registered setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeHint {
    Bool,
    Int,
    Float,
    Str,
    Json,
}

impl TypeHint {
    /// Human-readable name used in cast error messages
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TypeHint::Bool => "bool",
            TypeHint::Int => "int",
            TypeHint::Float => "float",
            TypeHint::Str => "str",
            TypeHint::Json => "json",
        }
    }
}

/// A resolved setting value.
///
/// Scalars get their own variants; anything structured (arrays, objects,
/// null) lives in `Json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Json(Value),
}

impl ConfigValue {
    /// Cast a raw source value according to a declared type hint.
    ///
    /// Casting rules:
    /// - `bool`: native booleans, or `"true"`/`"false"`/`"1"`/`"0"`
    ///   case-insensitively, or the numbers `1`/`0`
    /// - `int`/`float`: native numbers or numeric string parse
    /// - `str`: native strings; scalar booleans/numbers are stringified
    /// - `json`: strings are decoded as JSON documents, everything else
    ///   passes through
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeCast`] naming the key and the offending raw
    /// value when the cast is impossible.
    pub fn cast(key: &str, raw: &Value, hint: TypeHint) -> Result<Self> {
        let fail = || Error::TypeCast {
            key: key.to_string(),
            expected: hint.name(),
            raw: raw.to_string(),
        };

        match hint {
            TypeHint::Bool => match raw {
                Value::Bool(b) => Ok(ConfigValue::Bool(*b)),
                Value::String(s) => match s.to_ascii_lowercase().as_str() {
                    "true" | "1" => Ok(ConfigValue::Bool(true)),
                    "false" | "0" => Ok(ConfigValue::Bool(false)),
                    _ => Err(fail()),
                },
                Value::Number(n) => match n.as_i64() {
                    Some(1) => Ok(ConfigValue::Bool(true)),
                    Some(0) => Ok(ConfigValue::Bool(false)),
                    _ => Err(fail()),
                },
                _ => Err(fail()),
            },
            TypeHint::Int => match raw {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                    .map(ConfigValue::Int)
                    .ok_or_else(fail),
                Value::String(s) => s.trim().parse::<i64>().map(ConfigValue::Int).map_err(|_| fail()),
                _ => Err(fail()),
            },
            TypeHint::Float => match raw {
                Value::Number(n) => n.as_f64().map(ConfigValue::Float).ok_or_else(fail),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(ConfigValue::Float)
                    .map_err(|_| fail()),
                _ => Err(fail()),
            },
            TypeHint::Str => match raw {
                Value::String(s) => Ok(ConfigValue::Str(s.clone())),
                Value::Bool(b) => Ok(ConfigValue::Str(b.to_string())),
                Value::Number(n) => Ok(ConfigValue::Str(n.to_string())),
                _ => Err(fail()),
            },
            TypeHint::Json => match raw {
                Value::String(s) => serde_json::from_str(s)
                    .map(ConfigValue::Json)
                    .map_err(|_| fail()),
                other => Ok(ConfigValue::Json(other.clone())),
            },
        }
    }

    /// Wrap a raw value without casting, for keys no spec was registered for.
    ///
    /// Native scalars map onto their own variants; strings stay strings.
    #[must_use]
    pub fn passthrough(raw: Value) -> Self {
        match raw {
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::Number(ref n) => {
                if let Some(i) = n.as_i64() {
                    ConfigValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    ConfigValue::Float(f)
                } else {
                    ConfigValue::Json(raw)
                }
            }
            Value::String(s) => ConfigValue::Str(s),
            other => ConfigValue::Json(other),
        }
    }

    /// Convert into a `serde_json::Value` (for persistence and typed reads)
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            ConfigValue::Bool(b) => Value::Bool(*b),
            ConfigValue::Int(i) => Value::from(*i),
            ConfigValue::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number)
            }
            ConfigValue::Str(s) => Value::String(s.clone()),
            ConfigValue::Json(v) => v.clone(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; `Int` widens to `f64`
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ConfigValue::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Name of the variant, used in diagnostics
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Float(_) => "float",
            ConfigValue::Str(_) => "str",
            ConfigValue::Json(_) => "json",
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<i32> for ConfigValue {
    fn from(i: i32) -> Self {
        ConfigValue::Int(i64::from(i))
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Str(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Str(s)
    }
}

impl From<Value> for ConfigValue {
    fn from(v: Value) -> Self {
        ConfigValue::passthrough(v)
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Int(i) => write!(f, "{i}"),
            ConfigValue::Float(v) => write!(f, "{v}"),
            ConfigValue::Str(s) => write!(f, "{s}"),
            ConfigValue::Json(v) => write!(f, "{v}"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
