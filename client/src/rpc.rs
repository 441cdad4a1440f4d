//! JSON-RPC 2.0 transport for the wallet bridge.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use mintgate_chains::{AddChainRequest, SwitchChainRequest, WalletProvider};
use mintgate_faults::RawFault;

use crate::config::ClientConfig;
use crate::error::ClientError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client speaking JSON-RPC 2.0 to a wallet bridge.
///
/// The bridge relays `wallet_switchEthereumChain` and
/// `wallet_addEthereumChain` to the user's wallet and answers with either a
/// `result` or a JSON-RPC `error` object. Error objects pass through as
/// [`RawFault::Value`] untouched, so the session manager's predicates see
/// the wallet's original `code` and `message`.
pub struct RpcWalletProvider {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl RpcWalletProvider {
    /// Create a provider targeting the given endpoint
    /// (e.g. `http://127.0.0.1:9301`).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.wallet_bridge_url.clone(), config.request_timeout())
    }

    /// The configured bridge endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one JSON-RPC request and return the `result` field.
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RawFault> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "wallet bridge call");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RawFault::from(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RawFault::from(format!(
                "wallet bridge returned HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RawFault::from(format!("invalid JSON response: {e}")))?;

        if let Some(error) = json.get("error") {
            return Err(RawFault::from(error.clone()));
        }

        Ok(json
            .get("result")
            .cloned()
            .unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn switch_chain(&self, request: SwitchChainRequest) -> Result<(), RawFault> {
        self.rpc_call("wallet_switchEthereumChain", json!([request]))
            .await
            .map(|_| ())
    }

    async fn add_chain(&self, request: AddChainRequest) -> Result<(), RawFault> {
        self.rpc_call("wallet_addEthereumChain", json!([request]))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintgate_types::ChainId;

    #[test]
    fn provider_creation() {
        let provider =
            RpcWalletProvider::new("http://127.0.0.1:9301", Duration::from_secs(30)).unwrap();
        assert_eq!(provider.endpoint(), "http://127.0.0.1:9301");
    }

    #[test]
    fn request_ids_are_unique() {
        let provider =
            RpcWalletProvider::new("http://127.0.0.1:9301", Duration::from_secs(30)).unwrap();
        let first = provider.next_id.fetch_add(1, Ordering::Relaxed);
        let second = provider.next_id.fetch_add(1, Ordering::Relaxed);
        assert!(second > first);
    }

    #[test]
    fn switch_params_match_wallet_rpc_shape() {
        let request = SwitchChainRequest::new(ChainId::new(130));
        let params = json!([request]);
        assert_eq!(params, json!([{ "chainId": "0x82" }]));
    }
}
