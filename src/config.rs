//! Dashboard configuration and the persisted theme preference.
//!
//! Both live as JSON files under `<config dir>/urban-mobility/`. Missing files
//! and missing fields fall back to defaults.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::plotting::RendererKind;

/// Environment variable overriding [`DashboardConfig::api_base`].
pub const API_BASE_ENV: &str = "URBAN_MOBILITY_API";

const APP_DIR: &str = "urban-mobility";
const CONFIG_FILE: &str = "config.json";
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL every request path is appended to
    pub api_base: String,
    pub trips_page_size: usize,
    pub locations_page_size: usize,
    /// Quiet window before a search keystroke triggers a reload
    pub search_debounce_ms: u64,
    pub request_timeout_secs: u64,
    /// Maximum number of cached responses
    pub cache_capacity: usize,
    /// Which chart renderer draws the dashboard
    pub renderer: RendererKind,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000/api".to_string(),
            trips_page_size: 10,
            locations_page_size: 12,
            search_debounce_ms: 400,
            request_timeout_secs: 30,
            cache_capacity: 256,
            renderer: RendererKind::Library,
        }
    }
}

impl DashboardConfig {
    /// Load from `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_json(path).map(Option::unwrap_or_default)
    }

    /// Load from the user config directory and apply environment overrides.
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut config = match config_dir() {
            Some(dir) => Self::load(&dir.join(CONFIG_FILE))?,
            None => Self::default(),
        };
        config.apply_env(std::env::var(API_BASE_ENV).ok());
        Ok(config)
    }

    fn apply_env(&mut self, api_base: Option<String>) {
        if let Some(api_base) = api_base.filter(|v| !v.trim().is_empty()) {
            info!("Using API base from {}: {}", API_BASE_ENV, api_base);
            self.api_base = api_base;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// The only state the dashboard persists between runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
}

impl Preferences {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_json(path).map(Option::unwrap_or_default)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Location of the preferences file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join(PREFERENCES_FILE))
    }

    /// Load from the default location; unreadable files are logged and ignored.
    pub fn load_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        Self::load(&path).unwrap_or_else(|e| {
            warn!("Ignoring preferences: {}", e);
            Self::default()
        })
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
