//! Setting registration metadata.
//!
//! A [`SettingSpec`] declares one setting ahead of time: its key, declared
//! type, default value, and optional constraints. Registered keys are cast
//! and validated at resolve time; writes through the accessor are only
//! permitted for registered keys.
//!
//! Constraints are type-specific:
//!
//! - `allowed_values` — a closed set of permitted values (any hint)
//! - `min`/`max` — numeric range for `int`/`float` settings
//! - `pattern` — regex the value must match, for `str` settings
//!
//! ```rust
//! use confstack::{SettingSpec, ConfigValue};
//!
//! let port = SettingSpec::int("server.port", 8080)
//!     .min(1.0)
//!     .max(65535.0)
//!     .description("TCP port the server binds");
//!
//! let theme = SettingSpec::str("ui.theme", "dark")
//!     .allowed(["light", "dark", "system"]);
//!
//! assert!(port.validate_spec().is_ok());
//! assert_eq!(theme.default, ConfigValue::Str("dark".into()));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::value::{ConfigValue, TypeHint};

// =============================================================================
// Type-Specific Constraints
// =============================================================================

/// Range constraints for `int`/`float` settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NumberConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Constraints for `str` settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TextConstraints {
    /// Regex pattern the value must match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

// =============================================================================
// Setting Spec
// =============================================================================

/// Declaration of a single registered setting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingSpec {
    /// Unique key within a store (dot-separated by convention, e.g. "server.port")
    pub key: String,

    /// Declared type used for casting at resolve time
    #[serde(rename = "type")]
    pub hint: TypeHint,

    /// Fallback value when the key is absent from every source
    pub default: ConfigValue,

    /// Closed set of permitted values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<ConfigValue>>,

    /// Range constraints (int/float)
    #[serde(default, skip_serializing_if = "is_default_number")]
    pub number: NumberConstraints,

    /// Text constraints (str)
    #[serde(default, skip_serializing_if = "is_default_text")]
    pub text: TextConstraints,

    /// Free-form description for diagnostics and docs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn is_default_number(c: &NumberConstraints) -> bool {
    *c == NumberConstraints::default()
}

fn is_default_text(c: &TextConstraints) -> bool {
    *c == TextConstraints::default()
}

impl SettingSpec {
    fn new(key: impl Into<String>, hint: TypeHint, default: ConfigValue) -> Self {
        Self {
            key: key.into(),
            hint,
            default,
            allowed_values: None,
            number: NumberConstraints::default(),
            text: TextConstraints::default(),
            description: None,
        }
    }

    // =========================================================================
    // Type-specific constructors
    // =========================================================================

    /// Declare a boolean setting
    pub fn bool(key: impl Into<String>, default: bool) -> Self {
        Self::new(key, TypeHint::Bool, ConfigValue::Bool(default))
    }

    /// Declare an integer setting
    pub fn int(key: impl Into<String>, default: i64) -> Self {
        Self::new(key, TypeHint::Int, ConfigValue::Int(default))
    }

    /// Declare a float setting
    pub fn float(key: impl Into<String>, default: f64) -> Self {
        Self::new(key, TypeHint::Float, ConfigValue::Float(default))
    }

    /// Declare a string setting
    pub fn str(key: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(key, TypeHint::Str, ConfigValue::Str(default.into()))
    }

    /// Declare a structured JSON setting
    pub fn json(key: impl Into<String>, default: Value) -> Self {
        Self::new(key, TypeHint::Json, ConfigValue::Json(default))
    }

    // =========================================================================
    // Constraint setters (builder pattern)
    // =========================================================================

    /// Restrict the setting to a closed set of values
    #[must_use]
    pub fn allowed<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ConfigValue>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set minimum value (int/float)
    #[must_use]
    pub fn min(mut self, val: f64) -> Self {
        self.number.min = Some(val);
        self
    }

    /// Set maximum value (int/float)
    #[must_use]
    pub fn max(mut self, val: f64) -> Self {
        self.number.max = Some(val);
        self
    }

    /// Set regex pattern the value must match (str)
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.text.pattern = Some(pattern.into());
        self
    }

    /// Set a free-form description
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate a cast value against this spec's constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] naming the key when the value falls
    /// outside the allowed set, numeric range, or text pattern.
    pub fn validate(&self, value: &ConfigValue) -> Result<()> {
        let invalid = |reason: String| Error::InvalidValue {
            key: self.key.clone(),
            reason,
        };

        if let Some(ref allowed) = self.allowed_values {
            if !allowed.contains(value) {
                return Err(invalid(format!(
                    "'{value}' is not one of the allowed values"
                )));
            }
        }

        if let Some(num) = value.as_f64() {
            if let Some(min) = self.number.min {
                if num < min {
                    return Err(invalid(format!("value must be at least {min}")));
                }
            }
            if let Some(max) = self.number.max {
                if num > max {
                    return Err(invalid(format!("value must be at most {max}")));
                }
            }
        }

        if let (Some(pattern), Some(text)) = (self.text.pattern.as_deref(), value.as_str()) {
            let re = regex::Regex::new(pattern)
                .map_err(|e| invalid(format!("invalid regex pattern: {e}")))?;
            if !re.is_match(text) {
                return Err(invalid(format!("value does not match pattern: {pattern}")));
            }
        }

        Ok(())
    }

    /// Validate the spec definition itself.
    ///
    /// Run at store build time. Checks that constraints are coherent and
    /// that the default value satisfies them:
    /// - `min <= max`
    /// - pattern compiles and is non-empty
    /// - constraints apply to the declared type
    /// - allowed set is non-empty and contains the default
    /// - default passes `validate`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpec`] describing the first problem found.
    pub fn validate_spec(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidSpec {
            key: self.key.clone(),
            reason,
        };

        if self.key.is_empty() {
            return Err(invalid("key cannot be empty".into()));
        }

        if let (Some(min), Some(max)) = (self.number.min, self.number.max) {
            if min > max {
                return Err(invalid(format!("min ({min}) cannot exceed max ({max})")));
            }
        }

        if (self.number.min.is_some() || self.number.max.is_some())
            && !matches!(self.hint, TypeHint::Int | TypeHint::Float)
        {
            return Err(invalid("range constraints require an int or float type".into()));
        }

        if let Some(ref pattern) = self.text.pattern {
            if self.hint != TypeHint::Str {
                return Err(invalid("pattern constraints require a str type".into()));
            }
            if pattern.is_empty() {
                return Err(invalid("pattern cannot be an empty string".into()));
            }
            regex::Regex::new(pattern)
                .map_err(|e| invalid(format!("invalid regex pattern: {e}")))?;
        }

        if let Some(ref allowed) = self.allowed_values {
            if allowed.is_empty() {
                return Err(invalid("allowed set cannot be empty".into()));
            }
        }

        self.validate(&self.default)
            .map_err(|e| invalid(format!("default value is invalid: {e}")))
    }
}

// =============================================================================
// Helper Macro
// =============================================================================

/// Build a list of [`SettingSpec`]s more cleanly.
///
/// # Example
/// ```rust
/// use confstack::{specs, SettingSpec};
///
/// let registry = specs![
///     SettingSpec::str("ui.theme", "dark").allowed(["light", "dark"]),
///     SettingSpec::int("server.port", 8080).min(1.0).max(65535.0),
///     SettingSpec::bool("server.enabled", true),
/// ];
/// assert_eq!(registry.len(), 3);
/// ```
#[macro_export]
macro_rules! specs {
    ($($spec:expr),* $(,)?) => {{
        let list: Vec<$crate::SettingSpec> = vec![$($spec),*];
        list
    }};
}

// =============================================================================
// Tests
// =============================================================================
