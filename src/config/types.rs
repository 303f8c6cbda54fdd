//! Store-level options.

use std::path::PathBuf;

/// Options shared by every part of a [`ConfigStore`](crate::ConfigStore).
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Application name (used for the default config directory)
    pub app_name: String,

    /// Directory relative file sources and the persistence target resolve
    /// against
    pub config_dir: PathBuf,

    /// Pretty-print JSON when persisting
    pub pretty_json: bool,
}

impl StoreOptions {
    /// Resolve a config directory, expanding `~` to the home directory.
    ///
    /// When `dir` is `None`, falls back to the per-app system config
    /// directory, or the current directory if none is available.
    pub(crate) fn resolve_config_dir(app_name: &str, dir: Option<PathBuf>) -> PathBuf {
        match dir {
            Some(path) => expand_home(path),
            None => dirs::config_dir()
                .map(|d| d.join(app_name))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Resolve a possibly-relative file path against the config directory
    pub(crate) fn resolve_path(&self, path: impl Into<PathBuf>) -> PathBuf {
        let path = expand_home(path.into());
        if path.is_absolute() {
            path
        } else {
            self.config_dir.join(path)
        }
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap_or(&path));
        }
    }
    path
}
