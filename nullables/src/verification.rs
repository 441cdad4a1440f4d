//! Nullable verification provider — sessions whose events the test emits.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use mintgate_faults::RawFault;
use mintgate_verification::{ProviderEvent, ProviderSession, SessionId, VerificationProvider};

use crate::lock;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// A test provider that opens deterministic sessions.
///
/// Each opened session gets a fresh event channel; the paired sender is
/// retrievable via [`NullVerificationProvider::emitter`], so the test plays
/// the provider side by pushing scan/proof/result events.
#[derive(Default)]
pub struct NullVerificationProvider {
    open_faults: Mutex<VecDeque<RawFault>>,
    emitters: Mutex<Vec<mpsc::Sender<ProviderEvent>>>,
    closed: Mutex<Vec<SessionId>>,
    opened: Mutex<u64>,
}

impl NullVerificationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `open_session` call to fail.
    pub fn fail_next_open(&self, fault: RawFault) {
        lock(&self.open_faults).push_back(fault);
    }

    /// Event sender paired with the most recently opened session.
    pub fn emitter(&self) -> Option<mpsc::Sender<ProviderEvent>> {
        lock(&self.emitters).last().cloned()
    }

    /// Session ids torn down via `close_session`, in order.
    pub fn closed_sessions(&self) -> Vec<SessionId> {
        lock(&self.closed).clone()
    }

    /// How many sessions have been opened.
    pub fn opened_sessions(&self) -> u64 {
        *lock(&self.opened)
    }
}

#[async_trait]
impl VerificationProvider for NullVerificationProvider {
    async fn open_session(&self) -> Result<ProviderSession, RawFault> {
        if let Some(fault) = lock(&self.open_faults).pop_front() {
            return Err(fault);
        }
        let n = {
            let mut opened = lock(&self.opened);
            *opened += 1;
            *opened
        };
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        lock(&self.emitters).push(tx);
        Ok(ProviderSession {
            session_id: SessionId::new(format!("null-session-{n}")),
            scan_payload: format!("mintgate://verify/null-session-{n}"),
            events: rx,
        })
    }

    async fn close_session(&self, session_id: &SessionId) {
        lock(&self.closed).push(session_id.clone());
    }
}
