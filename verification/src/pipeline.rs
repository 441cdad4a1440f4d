//! The async driver around the pure machine.
//!
//! Owns the provider and submitter seams, feeds their events into a
//! [`VerificationMachine`], and translates failures through the classifier.
//! The machine mutex is held only across synchronous transitions, never
//! across an await point.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use mintgate_faults::{classify, RawFault};
use mintgate_types::SessionToken;

use crate::error::VerificationError;
use crate::events::{ProviderEvent, SessionOutcome};
use crate::machine::{EventDisposition, VerificationMachine, DEFAULT_EXPECTED_PROOFS};
use crate::mint::{MintOutcome, MintRequest, MintSubmitter};
use crate::provider::{SessionId, VerificationProvider};
use crate::state::{VerificationState, VerificationStatus};

/// Live handle for one verification cycle, returned by
/// [`VerificationPipeline::start`].
#[derive(Debug)]
pub struct ScanHandle {
    /// Token identifying this cycle; events carrying any other token are
    /// dropped.
    pub token: SessionToken,
    /// Payload the user scans out of band.
    pub scan_payload: String,
    /// The provider's event stream for this session.
    pub events: mpsc::Receiver<ProviderEvent>,
}

/// Coordinates one verification-and-mint cycle at a time.
pub struct VerificationPipeline {
    machine: Mutex<VerificationMachine>,
    /// Provider session of the live cycle, kept for teardown on cancel.
    session: Mutex<Option<SessionId>>,
    provider: Arc<dyn VerificationProvider>,
    submitter: Arc<dyn MintSubmitter>,
}

impl VerificationPipeline {
    pub fn new(
        provider: Arc<dyn VerificationProvider>,
        submitter: Arc<dyn MintSubmitter>,
    ) -> Self {
        Self::with_expected_proofs(provider, submitter, DEFAULT_EXPECTED_PROOFS)
    }

    pub fn with_expected_proofs(
        provider: Arc<dyn VerificationProvider>,
        submitter: Arc<dyn MintSubmitter>,
        expected_proofs: u32,
    ) -> Self {
        Self {
            machine: Mutex::new(VerificationMachine::new(expected_proofs)),
            session: Mutex::new(None),
            provider,
            submitter,
        }
    }

    /// Open a provider session and begin a cycle. Idle only.
    pub async fn start(&self) -> Result<ScanHandle, VerificationError> {
        {
            let machine = self.lock_machine();
            if machine.status() != VerificationStatus::Idle {
                return Err(VerificationError::WrongStatus {
                    expected: "Idle",
                    actual: machine.status(),
                });
            }
        }

        let session = self
            .provider
            .open_session()
            .await
            .map_err(|fault| VerificationError::Provider(classify(&fault)))?;
        let token = SessionToken::mint();

        let begun = {
            let mut machine = self.lock_machine();
            let begun = machine.begin(token);
            if begun.is_ok() {
                *self.lock_session() = Some(session.session_id.clone());
            }
            begun
        };
        if let Err(err) = begun {
            // Lost a race with a concurrent start; do not leak the session.
            self.provider.close_session(&session.session_id).await;
            return Err(err);
        }

        info!(session = %session.session_id, token = %token, "verification session opened");
        Ok(ScanHandle {
            token,
            scan_payload: session.scan_payload,
            events: session.events,
        })
    }

    /// Feed one provider event into the machine.
    ///
    /// Failure outcomes are classified before they are recorded, so the
    /// state only ever carries the fixed user-facing message.
    pub fn handle_event(&self, token: SessionToken, event: ProviderEvent) -> EventDisposition {
        let event = match event {
            ProviderEvent::Result(SessionOutcome::Failed { message }) => {
                let report = classify(&RawFault::from(message));
                debug!(code = report.code.as_str(), "provider reported failure");
                ProviderEvent::Result(SessionOutcome::Failed {
                    message: report.user_message.to_string(),
                })
            }
            other => other,
        };

        let disposition = self.lock_machine().apply(token, event);
        match disposition {
            EventDisposition::Applied => {}
            EventDisposition::StaleToken => debug!("dropped provider event with stale token"),
            EventDisposition::OutOfPlace => debug!("dropped out-of-place provider event"),
        }
        disposition
    }

    /// Pump the session's events in arrival order until the cycle leaves
    /// the active statuses or the provider hangs up.
    pub async fn run_session(&self, handle: &mut ScanHandle) -> VerificationStatus {
        while let Some(event) = handle.events.recv().await {
            self.handle_event(handle.token, event);
            if !self.status().is_cancellable() {
                break;
            }
        }
        self.status()
    }

    /// Submit the mint for the verified identifier and drive it to an
    /// outcome. Verified only.
    pub async fn mint(&self, recipient: impl Into<String>) -> Result<MintOutcome, VerificationError> {
        let recipient = recipient.into();
        let request = {
            let mut machine = self.lock_machine();
            let request = match machine.state().unique_identifier.clone() {
                Some(unique_identifier)
                    if machine.status() == VerificationStatus::Verified =>
                {
                    MintRequest {
                        unique_identifier,
                        recipient_address: recipient,
                        face_match_passed: machine.state().face_match_passed,
                        personhood_verified: machine.state().personhood_verified,
                    }
                }
                _ => {
                    return Err(VerificationError::WrongStatus {
                        expected: "Verified",
                        actual: machine.status(),
                    })
                }
            };
            machine.mint_started()?;
            request
        };

        info!(identifier = %request.unique_identifier, "submitting mint");
        let hash = match self.submitter.submit(&request).await {
            Ok(hash) => hash,
            Err(fault) => return self.mint_failed(fault),
        };

        debug!(tx = %hash, "mint submitted, awaiting confirmation");
        match self.submitter.await_confirmation(&hash).await {
            Ok(()) => {
                self.lock_machine().tx_confirmed(hash.clone())?;
                info!(tx = %hash, "mint confirmed");
                Ok(MintOutcome::Minted(hash))
            }
            Err(fault) => self.mint_failed(fault),
        }
    }

    /// Abort the active session: machine cancel plus provider teardown.
    pub async fn cancel(&self) -> Result<(), VerificationError> {
        let to_close = {
            let mut machine = self.lock_machine();
            machine.cancel()?;
            self.lock_session().take()
        };
        if let Some(session_id) = to_close {
            self.provider.close_session(&session_id).await;
            debug!(session = %session_id, "verification session closed");
        }
        Ok(())
    }

    /// Leave a terminal status. The token is invalidated, so any in-flight
    /// late events from the old session are dropped on arrival.
    pub fn reset(&self) -> Result<(), VerificationError> {
        let mut machine = self.lock_machine();
        machine.reset()?;
        self.lock_session().take();
        Ok(())
    }

    /// Cloned snapshot for the presentation layer.
    pub fn state(&self) -> VerificationState {
        self.lock_machine().state().clone()
    }

    pub fn status(&self) -> VerificationStatus {
        self.lock_machine().status()
    }

    /// Classify a mint failure: user rejection rolls back silently,
    /// anything else records the user message. Both leave the cycle in
    /// Verified.
    fn mint_failed(&self, fault: RawFault) -> Result<MintOutcome, VerificationError> {
        if fault.is_user_rejection() {
            info!("mint cancelled in wallet");
            self.lock_machine().mint_cancelled()?;
            return Ok(MintOutcome::Cancelled);
        }
        let report = classify(&fault);
        warn!(code = report.code.as_str(), "mint failed");
        self.lock_machine().tx_failed(report.user_message)?;
        Ok(MintOutcome::Failed(report))
    }

    fn lock_machine(&self) -> MutexGuard<'_, VerificationMachine> {
        match self.machine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<SessionId>> {
        match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintgate_faults::FaultCode;
    use mintgate_types::{TxHash, UniqueIdentifier};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use crate::provider::ProviderSession;

    /// Hands out one pre-built session per `open_session` call and records
    /// teardowns.
    #[derive(Default)]
    struct ScriptedProvider {
        sessions: StdMutex<VecDeque<Result<ProviderSession, RawFault>>>,
        closed: StdMutex<Vec<SessionId>>,
    }

    impl ScriptedProvider {
        fn script_session(&self) -> mpsc::Sender<ProviderEvent> {
            let (tx, rx) = mpsc::channel(16);
            let n = self.sessions.lock().unwrap().len();
            self.sessions.lock().unwrap().push_back(Ok(ProviderSession {
                session_id: SessionId::new(format!("session-{n}")),
                scan_payload: "mintgate://verify/session".to_string(),
                events: rx,
            }));
            tx
        }

        fn closed(&self) -> Vec<SessionId> {
            self.closed.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl VerificationProvider for ScriptedProvider {
        async fn open_session(&self) -> Result<ProviderSession, RawFault> {
            self.sessions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(RawFault::from("no session scripted")))
        }

        async fn close_session(&self, session_id: &SessionId) {
            self.closed.lock().unwrap().push(session_id.clone());
        }
    }

    /// Scripted mint relayer; empty queues answer success.
    #[derive(Default)]
    struct ScriptedSubmitter {
        submit_results: StdMutex<VecDeque<Result<TxHash, RawFault>>>,
        confirm_results: StdMutex<VecDeque<Result<(), RawFault>>>,
        requests: StdMutex<Vec<MintRequest>>,
    }

    impl ScriptedSubmitter {
        fn script_submit(&self, result: Result<TxHash, RawFault>) {
            self.submit_results.lock().unwrap().push_back(result);
        }

        fn script_confirmation(&self, result: Result<(), RawFault>) {
            self.confirm_results.lock().unwrap().push_back(result);
        }

        fn requests(&self) -> Vec<MintRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl MintSubmitter for ScriptedSubmitter {
        async fn submit(&self, request: &MintRequest) -> Result<TxHash, RawFault> {
            self.requests.lock().unwrap().push(request.clone());
            self.submit_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(TxHash::new("0xdeadbeef").unwrap()))
        }

        async fn await_confirmation(&self, _hash: &TxHash) -> Result<(), RawFault> {
            self.confirm_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(()))
        }
    }

    fn pipeline() -> (
        VerificationPipeline,
        Arc<ScriptedProvider>,
        Arc<ScriptedSubmitter>,
    ) {
        let provider = Arc::new(ScriptedProvider::default());
        let submitter = Arc::new(ScriptedSubmitter::default());
        let pipeline = VerificationPipeline::new(provider.clone(), submitter.clone());
        (pipeline, provider, submitter)
    }

    fn verified_event() -> ProviderEvent {
        ProviderEvent::Result(SessionOutcome::Verified {
            unique_identifier: UniqueIdentifier::from("0xabc123deadbeef0042"),
            face_match_passed: true,
            personhood_verified: true,
        })
    }

    /// Drive a fresh pipeline to Verified and return its live handle.
    async fn verified_pipeline() -> (
        VerificationPipeline,
        Arc<ScriptedProvider>,
        Arc<ScriptedSubmitter>,
        ScanHandle,
    ) {
        let (pipeline, provider, submitter) = pipeline();
        let events = provider.script_session();
        let mut handle = pipeline.start().await.unwrap();

        events.send(ProviderEvent::RequestReceived).await.unwrap();
        events.send(verified_event()).await.unwrap();
        drop(events);
        let status = pipeline.run_session(&mut handle).await;
        assert_eq!(status, VerificationStatus::Verified);
        (pipeline, provider, submitter, handle)
    }

    #[tokio::test]
    async fn start_opens_session_and_awaits_scan() {
        let (pipeline, provider, _) = pipeline();
        let _events = provider.script_session();

        let handle = pipeline.start().await.unwrap();

        assert_eq!(pipeline.status(), VerificationStatus::AwaitingScan);
        assert_eq!(handle.scan_payload, "mintgate://verify/session");
    }

    #[tokio::test]
    async fn start_requires_idle() {
        let (pipeline, provider, _) = pipeline();
        let _events = provider.script_session();
        let _handle = pipeline.start().await.unwrap();

        let err = pipeline.start().await.unwrap_err();
        assert!(matches!(
            err,
            VerificationError::WrongStatus {
                expected: "Idle",
                actual: VerificationStatus::AwaitingScan,
            }
        ));
    }

    #[tokio::test]
    async fn provider_failure_on_start_is_classified() {
        let (pipeline, _, _) = pipeline();

        let err = pipeline.start().await.unwrap_err();

        match err {
            VerificationError::Provider(report) => {
                assert_eq!(report.code, FaultCode::Unknown);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(pipeline.status(), VerificationStatus::Idle);
    }

    #[tokio::test]
    async fn full_flow_reaches_minted_with_explorer_ready_hash() {
        let (pipeline, provider, submitter) = pipeline();
        let events = provider.script_session();
        let mut handle = pipeline.start().await.unwrap();

        events.send(ProviderEvent::RequestReceived).await.unwrap();
        for count in 1..=4 {
            events
                .send(ProviderEvent::ProofProgress { count })
                .await
                .unwrap();
        }
        events.send(verified_event()).await.unwrap();

        let status = pipeline.run_session(&mut handle).await;
        assert_eq!(status, VerificationStatus::Verified);
        let state = pipeline.state();
        assert!(state.request_received);
        assert_eq!(state.proofs_generated, 4);

        let outcome = pipeline.mint("0x00000000000000000000000000000000000000aa").await.unwrap();
        assert_eq!(
            outcome,
            MintOutcome::Minted(TxHash::new("0xdeadbeef").unwrap())
        );
        let state = pipeline.state();
        assert_eq!(state.status, VerificationStatus::Minted);
        assert_eq!(state.mint_tx_hash.unwrap().as_str(), "0xdeadbeef");
        assert_eq!(
            state.unique_identifier.unwrap().expose(),
            "0xabc123deadbeef0042"
        );

        let request = &submitter.requests()[0];
        assert_eq!(request.unique_identifier.expose(), "0xabc123deadbeef0042");
        assert_eq!(
            request.recipient_address,
            "0x00000000000000000000000000000000000000aa"
        );
        assert!(request.face_match_passed);
        assert!(request.personhood_verified);
    }

    #[tokio::test]
    async fn failed_outcome_records_classified_user_message() {
        let (pipeline, provider, _) = pipeline();
        let events = provider.script_session();
        let mut handle = pipeline.start().await.unwrap();

        events.send(ProviderEvent::RequestReceived).await.unwrap();
        events
            .send(ProviderEvent::Result(SessionOutcome::Failed {
                message: "execution reverted: already claimed".to_string(),
            }))
            .await
            .unwrap();

        let status = pipeline.run_session(&mut handle).await;
        assert_eq!(status, VerificationStatus::Failed);
        assert_eq!(
            pipeline.state().error_message.as_deref(),
            Some(FaultCode::AlreadyClaimed.user_message())
        );
    }

    #[tokio::test]
    async fn cancel_tears_down_the_provider_session() {
        let (pipeline, provider, _) = pipeline();
        let _events = provider.script_session();
        let _handle = pipeline.start().await.unwrap();

        pipeline.cancel().await.unwrap();

        assert_eq!(pipeline.status(), VerificationStatus::Idle);
        assert_eq!(provider.closed(), vec![SessionId::new("session-0")]);
    }

    #[tokio::test]
    async fn stale_events_after_reset_are_dropped() {
        let (pipeline, provider, _) = pipeline();
        let events = provider.script_session();
        let mut handle = pipeline.start().await.unwrap();

        events.send(ProviderEvent::RequestReceived).await.unwrap();
        events
            .send(ProviderEvent::Result(SessionOutcome::Rejected))
            .await
            .unwrap();
        let status = pipeline.run_session(&mut handle).await;
        assert_eq!(status, VerificationStatus::Rejected);

        pipeline.reset().unwrap();
        assert_eq!(pipeline.state(), VerificationState::default());

        let disposition = pipeline.handle_event(handle.token, ProviderEvent::RequestReceived);
        assert_eq!(disposition, EventDisposition::StaleToken);
        assert_eq!(pipeline.status(), VerificationStatus::Idle);
    }

    #[tokio::test]
    async fn mint_rejection_in_wallet_rolls_back_silently() {
        let (pipeline, _, submitter, _handle) = verified_pipeline().await;
        submitter.script_submit(Err(RawFault::from(json!({ "code": 4001 }))));

        let outcome = pipeline.mint("0xaa").await.unwrap();

        assert_eq!(outcome, MintOutcome::Cancelled);
        let state = pipeline.state();
        assert_eq!(state.status, VerificationStatus::Verified);
        assert!(state.error_message.is_none());
    }

    #[tokio::test]
    async fn mint_confirmation_failure_allows_retry() {
        let (pipeline, _, submitter, _handle) = verified_pipeline().await;
        submitter.script_confirmation(Err(RawFault::from("execution reverted")));

        let outcome = pipeline.mint("0xaa").await.unwrap();
        match outcome {
            MintOutcome::Failed(report) => {
                assert_eq!(report.code, FaultCode::ExecutionReverted)
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let state = pipeline.state();
        assert_eq!(state.status, VerificationStatus::Verified);
        assert_eq!(
            state.error_message.as_deref(),
            Some(FaultCode::ExecutionReverted.user_message())
        );

        // Retry succeeds with the default scripted happy path.
        let outcome = pipeline.mint("0xaa").await.unwrap();
        assert!(matches!(outcome, MintOutcome::Minted(_)));
        assert_eq!(pipeline.status(), VerificationStatus::Minted);
    }

    #[tokio::test]
    async fn mint_requires_verified() {
        let (pipeline, provider, _) = pipeline();
        let _events = provider.script_session();
        let _handle = pipeline.start().await.unwrap();

        let err = pipeline.mint("0xaa").await.unwrap_err();
        assert!(matches!(
            err,
            VerificationError::WrongStatus {
                expected: "Verified",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn provider_hangup_leaves_cycle_in_processing() {
        let (pipeline, provider, _) = pipeline();
        let events = provider.script_session();
        let mut handle = pipeline.start().await.unwrap();

        events.send(ProviderEvent::RequestReceived).await.unwrap();
        drop(events);

        let status = pipeline.run_session(&mut handle).await;
        assert_eq!(status, VerificationStatus::Processing);
    }
}
