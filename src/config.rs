//! Server configuration: `config.toml` first, then environment overrides.

use std::env;
use std::io;
use std::path::Path;
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "TOURNAMENT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            if let Ok(value) = env::var($key) {
                match value.parse() {
                    Ok(value) => $config.$name = value,
                    Err(_) => log::warn!("Ignoring invalid value for {}: {:?}", $key, value),
                }
            }
        )*
    }};
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: LevelFilter,
    /// Create the next round in the same operation that records the last result of a round.
    pub auto_advance: bool,
    /// Completed and cancelled tournaments are dropped after this many idle hours.
    pub retention_hours: u64,
    pub cleanup_interval_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: LevelFilter::Info,
            auto_advance: true,
            retention_hours: 12,
            cleanup_interval_minutes: 30,
        }
    }
}

impl Config {
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Override fields from `HOST`, `PORT`, `LOG_LEVEL` and `AUTO_ADVANCE`.
    pub fn with_environment(mut self) -> Self {
        from_environment!(
            self,
            "HOST", host,
            "PORT", port,
            "LOG_LEVEL", log_level,
            "AUTO_ADVANCE", auto_advance,
        );
        self
    }

    /// Load from the file named by `TOURNAMENT_CONFIG` (or `config.toml`) and apply the
    /// environment. A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let config = match Self::from_file(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(err),
        };
        Ok(config.with_environment())
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours * 3600)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_minutes.max(1) * 60)
    }
}
