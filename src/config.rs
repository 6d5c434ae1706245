use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{EmbedError, Result};
use crate::model::to_bool;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "osm_embed.toml";

/// Set to a truthy value to turn off automatic migration while rendering
pub const DISABLE_MIGRATION_ENV: &str = "OSM_EMBED_DISABLE_MIGRATION";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub migration: MigrationSettings,
    pub logging: LoggingSettings,
}

/// Dataset overrides; `None` uses the copies compiled into the crate
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub providers: Option<PathBuf>,
    pub icons: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MigrationSettings {
    pub enabled: bool,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for daily-rotated JSON logs; console only when unset
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "osm-embed.log".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from [`DEFAULT_CONFIG_FILE`] if present,
    /// then apply environment overrides. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(EmbedError::Config(format!(
                        "config file does not exist: {}",
                        path.display()
                    )));
                }
                Self::from_toml_str(&fs::read_to_string(path)?)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_str(&fs::read_to_string(DEFAULT_CONFIG_FILE)?)?
            }
            None => Self::default(),
        };
        settings.apply_migration_override(std::env::var(DISABLE_MIGRATION_ENV).ok().as_deref());
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// A truthy kill-switch value disables migration regardless of the file
    pub fn apply_migration_override(&mut self, disable: Option<&str>) {
        if disable.is_some_and(to_bool) {
            self.migration.enabled = false;
        }
    }
}
