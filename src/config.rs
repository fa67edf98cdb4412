//! Configuration
//!
//! Read from `<config dir>/quran-drawer/config.json` when present. Missing
//! keys fall back to defaults; CLI flags are applied on top by `main`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const APP_DIR: &str = "quran-drawer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search_api_url: String,
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub debounce_ms: u64,
    pub history_limit: usize,
    pub translations: Vec<u32>,
    pub reciter_id: u32,
    pub playback_rate: f32,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_api_url: "https://search.quran.com/api".to_string(),
            api_url: "https://api.qurancdn.com/api/qdc".to_string(),
            request_timeout_secs: 15,
            debounce_ms: 1000,
            history_limit: 10,
            translations: vec![131],
            reciter_id: 7,
            playback_rate: 1.0,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// An explicit path must exist; a missing default file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config: Config =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "debounce_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(self.playback_rate > 0.0 && self.playback_rate <= 4.0) {
            return Err(ConfigError::Invalid {
                field: "playback_rate",
                reason: format!("{} is outside (0, 4]", self.playback_rate),
            });
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "history_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
