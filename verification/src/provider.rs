//! The verification-provider seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

use mintgate_faults::RawFault;

use crate::events::ProviderEvent;

/// Identifies one provider session, for teardown.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One open verification session.
///
/// The provider pushes events; they arrive on `events` in order. The
/// receiver closing means the provider hung up without a result.
#[derive(Debug)]
pub struct ProviderSession {
    pub session_id: SessionId,
    /// Encoded into the QR code the user scans out of band.
    pub scan_payload: String,
    pub events: mpsc::Receiver<ProviderEvent>,
}

/// External service producing proof-of-personhood results.
#[async_trait]
pub trait VerificationProvider: Send + Sync {
    /// Open a session and return its scan payload plus event stream.
    async fn open_session(&self) -> Result<ProviderSession, RawFault>;

    /// Tear down a session. Best effort: implementations log failures
    /// rather than surfacing them.
    async fn close_session(&self, session_id: &SessionId);
}
