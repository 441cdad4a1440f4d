//! The pure verification state machine.
//!
//! Every transition is a synchronous function with no I/O, so the whole
//! machine is testable without a provider, a wallet, or a runtime. The
//! async driver in [`crate::pipeline`] owns one machine and feeds it.

use mintgate_types::{SessionToken, TxHash};

use crate::error::VerificationError;
use crate::events::{ProviderEvent, SessionOutcome};
use crate::state::{VerificationState, VerificationStatus};

/// Proof count the provider is expected to reach for one verification.
pub const DEFAULT_EXPECTED_PROOFS: u32 = 4;

/// What happened to a provider event fed into the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventDisposition {
    /// The event was legal and took effect.
    Applied,
    /// The event carried a token from an earlier cycle; dropped.
    StaleToken,
    /// The event is not legal in the current status; dropped.
    OutOfPlace,
}

/// State machine for one verification-and-mint cycle at a time.
pub struct VerificationMachine {
    state: VerificationState,
    expected_proofs: u32,
    /// Token of the live cycle; `None` whenever the machine is idle.
    token: Option<SessionToken>,
}

impl VerificationMachine {
    pub fn new(expected_proofs: u32) -> Self {
        Self {
            state: VerificationState::default(),
            expected_proofs,
            token: None,
        }
    }

    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    pub fn status(&self) -> VerificationStatus {
        self.state.status
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.token
    }

    /// Start a cycle: `Idle` to `AwaitingScan`, adopting the cycle token.
    pub fn begin(&mut self, token: SessionToken) -> Result<(), VerificationError> {
        self.require(VerificationStatus::Idle, "Idle")?;
        self.token = Some(token);
        self.state.status = VerificationStatus::AwaitingScan;
        Ok(())
    }

    /// Feed one provider event.
    ///
    /// Events from an invalidated cycle (stale token) and events that are
    /// not legal in the current status are dropped without touching state.
    pub fn apply(&mut self, token: SessionToken, event: ProviderEvent) -> EventDisposition {
        if self.token != Some(token) {
            return EventDisposition::StaleToken;
        }
        match (self.state.status, event) {
            (VerificationStatus::AwaitingScan, ProviderEvent::RequestReceived) => {
                self.state.request_received = true;
                self.state.status = VerificationStatus::Processing;
                EventDisposition::Applied
            }
            (VerificationStatus::Processing, ProviderEvent::ProofProgress { count }) => {
                // Monotone and capped: repeats and regressions are no-ops.
                let capped = count.min(self.expected_proofs);
                if capped > self.state.proofs_generated {
                    self.state.proofs_generated = capped;
                }
                EventDisposition::Applied
            }
            (VerificationStatus::Processing, ProviderEvent::Result(outcome)) => {
                self.apply_outcome(outcome);
                EventDisposition::Applied
            }
            _ => EventDisposition::OutOfPlace,
        }
    }

    fn apply_outcome(&mut self, outcome: SessionOutcome) {
        match outcome {
            SessionOutcome::Verified {
                unique_identifier,
                face_match_passed,
                personhood_verified,
            } => {
                self.state.unique_identifier = Some(unique_identifier);
                self.state.face_match_passed = face_match_passed;
                self.state.personhood_verified = personhood_verified;
                self.state.status = VerificationStatus::Verified;
            }
            SessionOutcome::Failed { message } => {
                self.state.error_message = Some(message);
                self.state.status = VerificationStatus::Failed;
            }
            SessionOutcome::Rejected => {
                self.state.status = VerificationStatus::Rejected;
            }
            SessionOutcome::Duplicate { unique_identifier } => {
                // Retained for masked display only.
                self.state.unique_identifier = Some(unique_identifier);
                self.state.status = VerificationStatus::Duplicate;
            }
        }
    }

    /// `Verified` to `Minting`. The verification result must already have
    /// been approved off-chain by the privileged approver; the machine only
    /// depends on that having occurred.
    pub fn mint_started(&mut self) -> Result<(), VerificationError> {
        self.require(VerificationStatus::Verified, "Verified")?;
        self.state.error_message = None;
        self.state.status = VerificationStatus::Minting;
        Ok(())
    }

    /// `Minting` to `Minted`, recording the confirmed transaction.
    pub fn tx_confirmed(&mut self, hash: TxHash) -> Result<(), VerificationError> {
        self.require(VerificationStatus::Minting, "Minting")?;
        self.state.mint_tx_hash = Some(hash);
        self.state.status = VerificationStatus::Minted;
        Ok(())
    }

    /// `Minting` back to `Verified` with the failure recorded; the mint can
    /// be retried.
    pub fn tx_failed(&mut self, message: impl Into<String>) -> Result<(), VerificationError> {
        self.require(VerificationStatus::Minting, "Minting")?;
        self.state.error_message = Some(message.into());
        self.state.status = VerificationStatus::Verified;
        Ok(())
    }

    /// `Minting` back to `Verified` with nothing recorded: the user declined
    /// the transaction in the wallet, which is not an error.
    pub fn mint_cancelled(&mut self) -> Result<(), VerificationError> {
        self.require(VerificationStatus::Minting, "Minting")?;
        self.state.error_message = None;
        self.state.status = VerificationStatus::Verified;
        Ok(())
    }

    /// Leave a terminal status: clears every field and invalidates the
    /// token so late events from the old session are dropped.
    pub fn reset(&mut self) -> Result<(), VerificationError> {
        if !self.state.status.is_terminal() {
            return Err(VerificationError::WrongStatus {
                expected: "a terminal status",
                actual: self.state.status,
            });
        }
        self.clear();
        Ok(())
    }

    /// Abort an active session: same clearing as `reset`. The driver
    /// additionally tears down the provider session.
    pub fn cancel(&mut self) -> Result<(), VerificationError> {
        if !self.state.status.is_cancellable() {
            return Err(VerificationError::WrongStatus {
                expected: "an active session",
                actual: self.state.status,
            });
        }
        self.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.state = VerificationState::default();
        self.token = None;
    }

    fn require(
        &self,
        status: VerificationStatus,
        expected: &'static str,
    ) -> Result<(), VerificationError> {
        if self.state.status == status {
            Ok(())
        } else {
            Err(VerificationError::WrongStatus {
                expected,
                actual: self.state.status,
            })
        }
    }
}

impl Default for VerificationMachine {
    fn default() -> Self {
        Self::new(DEFAULT_EXPECTED_PROOFS)
    }
}
