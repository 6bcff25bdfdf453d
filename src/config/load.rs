use std::{env, path::Path, path::PathBuf};

use super::schema::Settings;
use crate::{CatalogError, Result};

impl Settings {
    /// Load settings from environment and the default config file, if any.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings, reading `explicit` instead of the default config path.
    /// An explicit file must exist; the default one is optional.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        match explicit {
            Some(path) => {
                builder = builder.add_source(::config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = resolve_config_path() {
                    builder = builder.add_source(::config::File::from(path.as_path()).required(false));
                }
            }
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MEDIA_CATALOG")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_range_chunk == 0 {
            return Err(CatalogError::Config("max_range_chunk must be >= 1".to_string()));
        }
        if self.secret.is_empty() {
            return Err(CatalogError::Config("secret must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Resolve the config path from `MEDIA_CATALOG_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MEDIA_CATALOG_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/media-catalog/config.toml`, or
/// `~/.config/media-catalog/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("media-catalog").join("config.toml"))
}
