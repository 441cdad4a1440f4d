//! HTTP transport for the mint relayer.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use mintgate_faults::RawFault;
use mintgate_types::TxHash;
use mintgate_verification::{MintRequest, MintSubmitter};

use crate::config::ClientConfig;
use crate::error::ClientError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// `POST /mint` reply.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitReply {
    tx_hash: TxHash,
}

/// `GET /tx/{hash}` reply.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum ReceiptReply {
    Pending,
    Confirmed,
    Failed {
        #[serde(default)]
        message: Option<String>,
    },
}

/// HTTP client for the mint relayer.
///
/// `submit` posts the mint request; `await_confirmation` polls the receipt
/// endpoint until the relayer reports the transaction confirmed or failed.
/// Relayer error bodies pass through as [`RawFault`] in original shape for
/// the classifier.
pub struct HttpMintSubmitter {
    http: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
}

impl HttpMintSubmitter {
    /// Create a submitter targeting the given base URL
    /// (e.g. `http://127.0.0.1:9303`).
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::HttpClient(e.to_string()))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            http,
            base_url,
            poll_interval,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(
            config.mint_relayer_url.clone(),
            config.request_timeout(),
            config.confirm_poll_interval(),
        )
    }

    /// The configured relayer base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MintSubmitter for HttpMintSubmitter {
    async fn submit(&self, request: &MintRequest) -> Result<TxHash, RawFault> {
        let response = self
            .http
            .post(format!("{}/mint", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| RawFault::from(format!("mint submission failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fault_from_body(status, response).await);
        }

        let reply: SubmitReply = response
            .json()
            .await
            .map_err(|e| RawFault::from(format!("invalid mint reply: {e}")))?;
        debug!(tx = ?reply.tx_hash, "mint accepted by relayer");
        Ok(reply.tx_hash)
    }

    async fn await_confirmation(&self, hash: &TxHash) -> Result<(), RawFault> {
        let url = format!("{}/tx/{hash}", self.base_url);
        loop {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| RawFault::from(format!("receipt poll failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(fault_from_body(status, response).await);
            }

            let receipt: ReceiptReply = response
                .json()
                .await
                .map_err(|e| RawFault::from(format!("invalid receipt reply: {e}")))?;
            match receipt {
                ReceiptReply::Confirmed => return Ok(()),
                ReceiptReply::Failed { message } => {
                    return Err(RawFault::from(
                        message.unwrap_or_else(|| "transaction failed".to_string()),
                    ));
                }
                ReceiptReply::Pending => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}

/// Preserve an error body for the classifier: JSON shapes pass through
/// untouched, anything else becomes text carrying the HTTP status.
async fn fault_from_body(status: reqwest::StatusCode, response: reqwest::Response) -> RawFault {
    match response.json::<serde_json::Value>().await {
        Ok(value) => RawFault::from(value),
        Err(_) => RawFault::from(format!("mint relayer returned HTTP {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submitter() -> HttpMintSubmitter {
        HttpMintSubmitter::new(
            "http://127.0.0.1:9303/",
            Duration::from_secs(30),
            Duration::from_millis(100),
        )
        .unwrap()
    }

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(submitter().base_url(), "http://127.0.0.1:9303");
    }

    #[test]
    fn submit_reply_parses() {
        let reply: SubmitReply = serde_json::from_value(json!({ "txHash": "0xdeadbeef" })).unwrap();
        assert_eq!(reply.tx_hash.as_str(), "0xdeadbeef");
    }

    #[test]
    fn receipt_replies_parse() {
        let pending: ReceiptReply = serde_json::from_value(json!({ "status": "pending" })).unwrap();
        assert!(matches!(pending, ReceiptReply::Pending));

        let confirmed: ReceiptReply =
            serde_json::from_value(json!({ "status": "confirmed" })).unwrap();
        assert!(matches!(confirmed, ReceiptReply::Confirmed));

        let failed: ReceiptReply = serde_json::from_value(
            json!({ "status": "failed", "message": "execution reverted: not whitelisted" }),
        )
        .unwrap();
        match failed {
            ReceiptReply::Failed { message } => {
                assert_eq!(message.as_deref(), Some("execution reverted: not whitelisted"));
            }
            other => panic!("unexpected receipt: {other:?}"),
        }

        let bare_failure: ReceiptReply =
            serde_json::from_value(json!({ "status": "failed" })).unwrap();
        assert!(matches!(bare_failure, ReceiptReply::Failed { message: None }));
    }
}
