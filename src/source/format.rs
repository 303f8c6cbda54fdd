//! On-disk formats for file-backed sources.
//!
//! Every format parses to the same flat shape: a map of top-level keys to
//! raw `serde_json::Value`s. Line-oriented formats (INI, env files) always
//! produce string values; typed conversion for registered keys happens later
//! at resolve time.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// File format consumed (and for most formats, produced) by a
/// [`FileSource`](crate::FileSource).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// A JSON object; nested values pass through as structured JSON
    Json,
    /// INI-style `key = value` with optional `[section]` headers; section
    /// names prefix keys as `section.key`
    Ini,
    /// `.env`-style `KEY=VALUE` lines; keys are mapped like environment
    /// variables (lowercased, `_` becomes `.`)
    EnvFile,
    /// A TOML document; nested tables pass through as structured JSON
    #[cfg(feature = "toml")]
    Toml,
    /// A YAML mapping; nested values pass through as structured JSON
    #[cfg(feature = "yaml")]
    Yaml,
}

impl FileFormat {
    /// Conventional file extension for this format
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Ini => "ini",
            FileFormat::EnvFile => "env",
            #[cfg(feature = "toml")]
            FileFormat::Toml => "toml",
            #[cfg(feature = "yaml")]
            FileFormat::Yaml => "yaml",
        }
    }

    /// Whether [`serialize`](Self::serialize) is supported for this format
    #[must_use]
    pub fn is_writable(self) -> bool {
        match self {
            FileFormat::Json | FileFormat::Ini | FileFormat::EnvFile => true,
            #[cfg(feature = "toml")]
            FileFormat::Toml => false,
            #[cfg(feature = "yaml")]
            FileFormat::Yaml => false,
        }
    }

    /// Parse file content into a flat key map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] naming `path` (and the line for
    /// line-oriented formats) on malformed content.
    pub fn parse(self, content: &str, path: &Path) -> Result<BTreeMap<String, Value>> {
        match self {
            FileFormat::Json => parse_json(content, path),
            FileFormat::Ini => parse_ini(content, path),
            FileFormat::EnvFile => parse_env_file(content, path),
            #[cfg(feature = "toml")]
            FileFormat::Toml => parse_toml(content, path),
            #[cfg(feature = "yaml")]
            FileFormat::Yaml => parse_yaml(content, path),
        }
    }

    /// Serialize a flat key map back to file content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for read-only formats.
    pub fn serialize(
        self,
        map: &BTreeMap<String, Value>,
        pretty_json: bool,
    ) -> Result<String> {
        match self {
            FileFormat::Json => {
                let object: serde_json::Map<String, Value> =
                    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                let value = Value::Object(object);
                let content = if pretty_json {
                    serde_json::to_string_pretty(&value)?
                } else {
                    serde_json::to_string(&value)?
                };
                Ok(content)
            }
            FileFormat::Ini => Ok(serialize_ini(map)),
            FileFormat::EnvFile => Ok(serialize_env_file(map)),
            #[cfg(feature = "toml")]
            FileFormat::Toml => Err(Error::Config(
                "TOML sources are read-only and cannot be persisted".into(),
            )),
            #[cfg(feature = "yaml")]
            FileFormat::Yaml => Err(Error::Config(
                "YAML sources are read-only and cannot be persisted".into(),
            )),
        }
    }
}

// =============================================================================
// JSON
// =============================================================================

fn parse_json(content: &str, path: &Path) -> Result<BTreeMap<String, Value>> {
    let value: Value = serde_json::from_str(content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        line: Some(e.line()),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(object) => Ok(object.into_iter().collect()),
        other => Err(Error::Parse {
            path: path.to_path_buf(),
            line: None,
            reason: format!("top level must be an object, got {}", type_of(&other)),
        }),
    }
}

fn type_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// INI
// =============================================================================

fn parse_ini(content: &str, path: &Path) -> Result<BTreeMap<String, Value>> {
    let mut map = BTreeMap::new();
    let mut section: Option<String> = None;

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(parse_error(path, idx, "unterminated section header"));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(parse_error(path, idx, "empty section name"));
            }
            section = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(parse_error(path, idx, "expected 'key = value'"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(parse_error(path, idx, "empty key"));
        }

        let full_key = match &section {
            Some(section) => format!("{section}.{key}"),
            None => key.to_string(),
        };
        map.insert(full_key, Value::String(unquote(value.trim()).to_string()));
    }

    Ok(map)
}

fn serialize_ini(map: &BTreeMap<String, Value>) -> String {
    // Group dotted keys under [section] headers; bare keys come first.
    let mut out = String::new();
    let mut sections: BTreeMap<&str, Vec<(&str, &Value)>> = BTreeMap::new();

    for (key, value) in map {
        match key.split_once('.') {
            Some((section, rest)) => sections.entry(section).or_default().push((rest, value)),
            None => out.push_str(&format!("{key} = {}\n", ini_value(value))),
        }
    }

    for (section, entries) in sections {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("[{section}]\n"));
        for (key, value) in entries {
            out.push_str(&format!("{key} = {}\n", ini_value(value)));
        }
    }

    out
}

fn ini_value(value: &Value) -> String {
    match value {
        Value::String(s) => {
            let needs_quotes = s.is_empty()
                || s.starts_with(char::is_whitespace)
                || s.ends_with(char::is_whitespace)
                || s.contains(['#', ';']);
            if needs_quotes {
                format!("\"{s}\"")
            } else {
                s.clone()
            }
        }
        other => other.to_string(),
    }
}

// =============================================================================
// Env files
// =============================================================================

fn parse_env_file(content: &str, path: &Path) -> Result<BTreeMap<String, Value>> {
    let mut map = BTreeMap::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").map_or(line, str::trim);
        let Some((key, value)) = line.split_once('=') else {
            return Err(parse_error(path, idx, "expected 'KEY=VALUE'"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(parse_error(path, idx, "empty key"));
        }

        map.insert(
            logical_env_key(key),
            Value::String(unquote(value.trim()).to_string()),
        );
    }

    Ok(map)
}

fn serialize_env_file(map: &BTreeMap<String, Value>) -> String {
    let mut out = String::new();
    for (key, value) in map {
        let var = key.replace('.', "_").to_uppercase();
        let rendered = match value {
            Value::String(s) => {
                if s.is_empty() || s.contains([' ', '#', '"']) {
                    format!("{:?}", s)
                } else {
                    s.clone()
                }
            }
            other => format!("{:?}", other.to_string()),
        };
        out.push_str(&format!("{var}={rendered}\n"));
    }
    out
}

/// Map a `SCREAMING_SNAKE` variable name to the logical dotted key form
pub(crate) fn logical_env_key(name: &str) -> String {
    name.to_lowercase().replace('_', ".")
}

// =============================================================================
// TOML / YAML (feature-gated)
// =============================================================================

#[cfg(feature = "toml")]
fn parse_toml(content: &str, path: &Path) -> Result<BTreeMap<String, Value>> {
    let table: toml::Table = toml::from_str(content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        line: None,
        reason: e.to_string(),
    })?;

    let value = serde_json::to_value(table)?;
    match value {
        Value::Object(object) => Ok(object.into_iter().collect()),
        _ => unreachable!("a TOML table serializes to a JSON object"),
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(content: &str, path: &Path) -> Result<BTreeMap<String, Value>> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(object) => Ok(object.into_iter().collect()),
        Value::Null => Ok(BTreeMap::new()),
        other => Err(Error::Parse {
            path: path.to_path_buf(),
            line: None,
            reason: format!("top level must be a mapping, got {}", type_of(&other)),
        }),
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

fn parse_error(path: &Path, line_idx: usize, reason: &str) -> Error {
    Error::Parse {
        path: path.to_path_buf(),
        line: Some(line_idx + 1),
        reason: reason.to_string(),
    }
}

/// Strip one pair of matching surrounding quotes, if present
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// =============================================================================
// Tests
// =============================================================================
