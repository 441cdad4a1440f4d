//! Transaction hash type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;

/// A `0x`-prefixed transaction hash, as reported by the mint submitter.
///
/// Stored in its wire form (string) because the hash is only ever displayed
/// and interpolated into explorer links, never interpreted.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(String);

impl TxHash {
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        let body = value
            .strip_prefix("0x")
            .ok_or_else(|| TypeError::InvalidTxHash(value.clone()))?;
        if body.is_empty() || hex::decode(body).is_err() {
            return Err(TypeError::InvalidTxHash(value.clone()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TxHash {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TxHash> for String {
    fn from(hash: TxHash) -> Self {
        hash.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 4 hash bytes are enough to correlate log lines.
        let short = &self.0[..self.0.len().min(10)];
        write!(f, "TxHash({short}…)")
    }
}
