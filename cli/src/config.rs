//! CLI configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use mintgate_client::ClientConfig;
use mintgate_types::{ChainDescriptor, ChainRegistry};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Configuration for the `mintgate` binary.
///
/// Can be loaded from a TOML file via [`CliConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so
/// an empty file is a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliConfig {
    /// Chain the wallet session starts on (decimal id).
    #[serde(default = "default_chain")]
    pub default_chain: u64,

    /// Endpoints and timing for the three transports.
    #[serde(default)]
    pub client: ClientConfig,

    /// Supported chain descriptors; defaults to the standard registry.
    #[serde(default = "default_chains")]
    pub chains: Vec<ChainDescriptor>,
}

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CliError> {
        toml::from_str(s).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("CliConfig is always serializable to TOML")
    }

    /// Build the chain registry from the configured descriptors.
    pub fn registry(&self) -> Result<ChainRegistry, CliError> {
        ChainRegistry::from_descriptors(self.chains.clone())
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_chain: default_chain(),
            client: ClientConfig::default(),
            chains: default_chains(),
        }
    }
}

fn default_chain() -> u64 {
    1
}

fn default_chains() -> Vec<ChainDescriptor> {
    ChainRegistry::standard().iter().cloned().collect()
}
