//! Container configuration and configuration loading errors.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {source}")]
    ParseError {
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Tuning for a [`StateContainer`](crate::StateContainer).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Effects queued per observer before new ones are dropped.
    pub effect_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { effect_capacity: 16 }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.effect_capacity == 0 {
            return Err(ConfigError::ValidationError {
                message: "store.effect_capacity must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
