//! Error types for confstack

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for confstack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for confstack
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{}': {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{}': {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Source Errors
    // -------------------------------------------------------------------------
    #[error("Malformed content in '{}'{}: {reason}", .path.display(), .line.map(|n| format!(" (line {n})")).unwrap_or_default())]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        reason: String,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Setting Errors
    // -------------------------------------------------------------------------
    #[error("Cannot cast value for '{key}': expected {expected}, got raw value {raw}")]
    TypeCast {
        key: String,
        expected: &'static str,
        raw: String,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Invalid spec for '{key}': {reason}")]
    InvalidSpec { key: String, reason: String },

    #[error("Setting '{0}' is not registered")]
    NotRegistered(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Store not initialized: call resolve() before reading settings")]
    NotInitialized,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a parse-type error (malformed source content)
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// The setting key this error was raised for, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::TypeCast { key, .. }
            | Error::InvalidValue { key, .. }
            | Error::InvalidSpec { key, .. } => Some(key),
            Error::NotRegistered(key) => Some(key),
            _ => None,
        }
    }
}
