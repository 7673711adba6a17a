//! Configuration types and loading
//!
//! Every section and key is optional; missing values fall back to the built-in
//! defaults.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mamabear_client::TransmissionClient;
use mamabear_exec::LocalExecutor;
use mamabear_inventory::{FactCatalog, InventoryCollector, ToolPaths};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

/// Default display name of the fleet
pub const DEFAULT_FLEET_NAME: &str = "Mamabear Test";
/// Default backend endpoint
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:7777/inventory/mamabear";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Fleet branding and backend
    pub fleet: FleetConfig,
    /// Collection settings
    pub collector: CollectorConfig,
    /// Utility locations
    pub tools: ToolPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fleet: FleetConfig::default(),
            collector: CollectorConfig::default(),
            tools: ToolPaths::default(),
        }
    }
}

/// Per-deployment branding and backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Display name
    pub name: String,
    /// Base64 encoded logo image
    pub logo: Option<String>,
    /// Endpoint receiving the inventory
    pub backend_url: String,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_FLEET_NAME.to_string(),
            logo: None,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

/// Collection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Upper bound on a single utility invocation, in seconds
    pub command_timeout_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: 60,
        }
    }
}

impl CollectorConfig {
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// Decoded branding shown by front ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetBranding {
    pub name: String,
    /// Raw image bytes
    pub logo: Option<Vec<u8>>,
}

impl Config {
    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML or fails validation
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read, parsed or validated
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check values that serde cannot
    ///
    /// # Errors
    /// Returns error on an unusable backend URL, a malformed logo or a zero timeout
    pub fn validate(&self) -> Result<(), CoreError> {
        self.backend_url()?;
        self.branding()?;
        if self.collector.command_timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "collector.command_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed backend URL
    ///
    /// # Errors
    /// Returns error if the URL does not parse or is not http(s)
    pub fn backend_url(&self) -> Result<Url, CoreError> {
        let url = Url::parse(&self.fleet.backend_url).map_err(|e| {
            CoreError::ConfigError(format!(
                "invalid fleet.backend_url {:?}: {e}",
                self.fleet.backend_url
            ))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CoreError::ConfigError(format!(
                "fleet.backend_url must use http or https, got {other}"
            ))),
        }
    }

    /// Fleet name and decoded logo
    ///
    /// # Errors
    /// Returns error if the logo is not valid base64
    pub fn branding(&self) -> Result<FleetBranding, CoreError> {
        let logo = self
            .fleet
            .logo
            .as_deref()
            .map(|encoded| {
                STANDARD
                    .decode(encoded.trim())
                    .map_err(|e| CoreError::ConfigError(format!("invalid fleet.logo: {e}")))
            })
            .transpose()?;

        Ok(FleetBranding {
            name: self.fleet.name.clone(),
            logo,
        })
    }

    /// Collector running the standard catalog against local utilities
    #[must_use]
    pub fn build_collector(&self) -> InventoryCollector {
        InventoryCollector::new(Arc::new(LocalExecutor::new()), FactCatalog::macos())
            .with_tools(self.tools.clone())
            .with_timeout(self.collector.command_timeout())
    }

    /// Client posting to the configured backend
    ///
    /// # Errors
    /// Returns error if the backend URL is invalid
    pub fn build_client(&self) -> Result<TransmissionClient, CoreError> {
        let url = self.backend_url()?;
        Ok(TransmissionClient::new(url)?)
    }
}
