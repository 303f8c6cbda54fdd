//! File-backed configuration source.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::source::format::FileFormat;
use crate::source::ConfigSource;

/// A configuration source reading one file in a fixed [`FileFormat`].
///
/// A missing file is not an error: `load()` returns an empty map so callers
/// fall back to lower-precedence sources and defaults. Malformed content
/// always surfaces as [`Error::Parse`].
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: FileFormat,
    name: String,
}

impl FileSource {
    /// Create a source for `path` in the given format.
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, format, name }
    }

    /// The file path this source reads
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The format this source parses
    #[must_use]
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Serialize `map` and write it to the source file atomically.
    ///
    /// Writes to a temp file in the same directory and renames it over the
    /// target, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for read-only formats, or an I/O error
    /// variant when the write fails.
    pub(crate) fn persist(&self, map: &BTreeMap<String, Value>, pretty_json: bool) -> Result<()> {
        let content = self.format.serialize(map, pretty_json)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file_name = self.path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid path '{}': must have a filename",
                self.path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = self.path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| Error::FileWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl ConfigSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<BTreeMap<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file {} not found, starting empty", self.path.display());
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                return Err(Error::FileRead {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        self.format.parse(&content, &self.path)
    }
}

// =============================================================================
// Tests
// =============================================================================
