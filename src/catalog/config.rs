//! Catalog feature configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{ConfigError, StoreConfig};

/// How duplicate load requests are recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardPolicy {
    /// Suppress a load while the same operation is in flight or its data
    /// is already present. A detail request for a different id supersedes
    /// the one in flight.
    #[default]
    InFlight,
    /// Suppress a load only when data is already present, whatever id it
    /// belongs to. Concurrent duplicate loads are possible, and they share
    /// one in-flight flag: `is_loading` turns false when the first of them
    /// settles, even while another is still running.
    PresenceOfData,
}

/// Remote endpoint paths, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub list_path: String,
    /// Must contain `{id}`.
    pub detail_path: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            list_path: "v4/anime".to_string(),
            detail_path: "v4/anime/{id}".to_string(),
        }
    }
}

impl Endpoints {
    pub fn detail_path_for(&self, id: u32) -> String {
        self.detail_path.replace("{id}", &id.to_string())
    }
}

/// Configuration of the catalog feature.
///
/// ```toml
/// fallback_error_message = "Something went wrong"
/// guard_policy = "in_flight"
///
/// [store]
/// effect_capacity = 16
///
/// [endpoints]
/// list_path = "v4/anime"
/// detail_path = "v4/anime/{id}"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub store: StoreConfig,
    /// Shown when a failure carries no message.
    pub fallback_error_message: String,
    pub guard_policy: GuardPolicy,
    pub endpoints: Endpoints,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            fallback_error_message: "Something went wrong".to_string(),
            guard_policy: GuardPolicy::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl CatalogConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CatalogConfig =
            toml::from_str(content).map_err(|source| ConfigError::ParseError { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// - If the file doesn't exist, returns `CatalogConfig::default()`.
    /// - Otherwise parses and validates it.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no catalog config file, using defaults");
            return Ok(CatalogConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The effect queue holds at least one effect
    /// - The fallback error message is not blank
    /// - The detail path has an `{id}` placeholder
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;

        if self.fallback_error_message.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "fallback_error_message must not be empty".to_string(),
            });
        }

        if !self.endpoints.detail_path.contains("{id}") {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "endpoints.detail_path '{}' has no {{id}} placeholder",
                    self.endpoints.detail_path
                ),
            });
        }

        Ok(())
    }
}
