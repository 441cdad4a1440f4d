//! The shape-unknown raw failure.
//!
//! Wallet bridges hand back JSON-RPC error objects, verification providers
//! hand back plain strings, HTTP layers hand back whatever the server wrote.
//! [`RawFault`] carries any of these untouched so the classifier (and the
//! chain-switch predicates below) can inspect the original shape.

use serde_json::Value;
use std::fmt;

use crate::rules::{contains_any, USER_REJECTION_NEEDLES};

/// EIP-1193: the user rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;
/// EIP-3085/3326: the wallet does not recognize the requested chain.
pub const CODE_CHAIN_UNRECOGNIZED: i64 = 4902;
/// JSON-RPC internal error; some wallets answer this for unknown chains.
pub const CODE_INTERNAL_ERROR: i64 = -32603;

/// Message fragments some wallets use instead of a chain-unrecognized code.
const CHAIN_UNRECOGNIZED_NEEDLES: &[&str] = &[
    "unsupported chainid",
    "unrecognized chain",
    "chain not found",
    "unknown chain",
    "not supported",
];

const UNKNOWN_MESSAGE: &str = "Unknown error";

/// A failure exactly as some collaborator reported it.
#[derive(Clone, Debug, PartialEq)]
pub enum RawFault {
    Text(String),
    Value(Value),
}

impl RawFault {
    /// Capture any error by its rendered message.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::Text(err.to_string())
    }

    /// Best-effort human-readable message.
    ///
    /// Extraction order, first usable string wins: the plain text / JSON
    /// string itself, then object `.message`, `.reason`, `.error` (as a
    /// string or its nested `.message`), `.shortMessage`. Falls back to
    /// `"Unknown error"`.
    pub fn message(&self) -> String {
        match self {
            RawFault::Text(text) => usable(text),
            RawFault::Value(value) => extract(value),
        }
        .unwrap_or_else(|| UNKNOWN_MESSAGE.to_string())
    }

    /// The wallet's numeric error code, from `.code` or nested `.error.code`.
    pub fn wallet_code(&self) -> Option<i64> {
        match self {
            RawFault::Text(_) => None,
            RawFault::Value(value) => value.get("code").and_then(Value::as_i64).or_else(|| {
                value
                    .get("error")
                    .and_then(|inner| inner.get("code"))
                    .and_then(Value::as_i64)
            }),
        }
    }

    /// Whether the wallet user declined the request (code 4001 or an
    /// equivalent message). These failures are swallowed, never surfaced.
    pub fn is_user_rejection(&self) -> bool {
        if self.wallet_code() == Some(CODE_USER_REJECTED) {
            return true;
        }
        contains_any(&self.message().to_lowercase(), USER_REJECTION_NEEDLES)
    }

    /// Whether the wallet does not know the requested chain (codes 4902 or
    /// -32603, or an equivalent message). Triggers the add-chain fallback.
    pub fn is_chain_unrecognized(&self) -> bool {
        if matches!(
            self.wallet_code(),
            Some(CODE_CHAIN_UNRECOGNIZED | CODE_INTERNAL_ERROR)
        ) {
            return true;
        }
        contains_any(&self.message().to_lowercase(), CHAIN_UNRECOGNIZED_NEEDLES)
    }
}

fn usable(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn extract(value: &Value) -> Option<String> {
    if let Some(text) = value.as_str() {
        return usable(text);
    }
    if let Some(found) = value.get("message").and_then(Value::as_str).and_then(usable) {
        return Some(found);
    }
    if let Some(found) = value.get("reason").and_then(Value::as_str).and_then(usable) {
        return Some(found);
    }
    if let Some(inner) = value.get("error") {
        if let Some(found) = inner.as_str().and_then(usable) {
            return Some(found);
        }
        if let Some(found) = inner.get("message").and_then(Value::as_str).and_then(usable) {
            return Some(found);
        }
    }
    value
        .get("shortMessage")
        .and_then(Value::as_str)
        .and_then(usable)
}

impl From<&str> for RawFault {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RawFault {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for RawFault {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl fmt::Display for RawFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for RawFault {}
