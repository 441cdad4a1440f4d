//! Transport endpoint configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoints and timing for the three reference transports.
///
/// Every field has a serde default so a partial `[client]` table in the
/// CLI's TOML file works; an absent table yields [`ClientConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Wallet bridge JSON-RPC endpoint.
    #[serde(default = "default_wallet_bridge_url")]
    pub wallet_bridge_url: String,

    /// Verification service WebSocket endpoint.
    #[serde(default = "default_verification_url")]
    pub verification_url: String,

    /// Mint relayer HTTP endpoint.
    #[serde(default = "default_mint_relayer_url")]
    pub mint_relayer_url: String,

    /// Per-request timeout for HTTP calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Receipt poll interval while awaiting mint confirmation, in
    /// milliseconds.
    #[serde(default = "default_confirm_poll_interval_ms")]
    pub confirm_poll_interval_ms: u64,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn confirm_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_poll_interval_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            wallet_bridge_url: default_wallet_bridge_url(),
            verification_url: default_verification_url(),
            mint_relayer_url: default_mint_relayer_url(),
            request_timeout_secs: default_request_timeout_secs(),
            confirm_poll_interval_ms: default_confirm_poll_interval_ms(),
        }
    }
}

fn default_wallet_bridge_url() -> String {
    "http://127.0.0.1:9301".to_string()
}

fn default_verification_url() -> String {
    "ws://127.0.0.1:9302/session".to_string()
}

fn default_mint_relayer_url() -> String {
    "http://127.0.0.1:9303".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_confirm_poll_interval_ms() -> u64 {
    1500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_yields_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.confirm_poll_interval(), Duration::from_millis(1500));
    }

    #[test]
    fn partial_table_keeps_remaining_defaults() {
        let toml_str = r#"
            wallet_bridge_url = "http://bridge.example:8545"
            confirm_poll_interval_ms = 500
        "#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.wallet_bridge_url, "http://bridge.example:8545");
        assert_eq!(config.confirm_poll_interval_ms, 500);
        assert_eq!(config.verification_url, default_verification_url());
        assert_eq!(config.request_timeout_secs, 30);
    }
}
