use std::env;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// Default path: `$XDG_CONFIG_HOME/media-catalog/config.toml` or
/// `~/.config/media-catalog/config.toml`.
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MEDIA_CATALOG__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Salt for track, playlist and storage IDs. Changing it changes every ID.
    pub secret: String,
    /// Largest number of bytes served for a single range request.
    pub max_range_chunk: u64,
    /// Seconds a client may cache served track data.
    pub cache_max_age: u64,
    pub storage: Vec<StorageSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            secret: "media-catalog-dev-secret".to_string(),
            max_range_chunk: 1024 * 1024,
            cache_max_age: 3600,
            storage: Vec::new(),
        }
    }
}

impl Settings {
    /// Configured storages, or a single null storage when there are none.
    pub fn storages(&self) -> Vec<StorageSettings> {
        if self.storage.is_empty() {
            vec![StorageSettings::null()]
        } else {
            self.storage.clone()
        }
    }
}

/// One storage backend.
///
/// ```toml
/// [[storage]]
/// kind = "disk"
/// path = "$HOME/Music"
/// patterns = ['^(?P<trackno>\d+) - (?P<title>.+)$']
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Registry tag: `disk` or `null`.
    pub kind: String,
    pub path: String,
    /// Filename patterns with named groups, tried in order.
    pub patterns: Vec<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            kind: "disk".to_string(),
            path: String::new(),
            patterns: Vec::new(),
        }
    }
}

impl StorageSettings {
    pub fn null() -> Self {
        Self {
            kind: "null".to_string(),
            ..Self::default()
        }
    }

    pub fn disk(path: impl Into<String>, patterns: Vec<String>) -> Self {
        Self {
            kind: "disk".to_string(),
            path: path.into(),
            patterns,
        }
    }

    /// The storage path with `$HOME` expanded. An empty path is the current
    /// directory.
    pub fn resolved_path(&self) -> PathBuf {
        if self.path.is_empty() {
            return PathBuf::from(".");
        }
        match env::var("HOME") {
            Ok(home) => PathBuf::from(self.path.replace("$HOME", &home)),
            Err(_) => PathBuf::from(&self.path),
        }
    }
}
