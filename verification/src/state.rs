//! Verification cycle state.

use serde::{Deserialize, Serialize};

use mintgate_types::{TxHash, UniqueIdentifier};

/// The current stage of a verification cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// No cycle active.
    Idle,
    /// Session open; waiting for the user to scan the payload.
    AwaitingScan,
    /// Scan received; the provider is generating proofs.
    Processing,
    /// Personhood verified; the mint is available.
    Verified,
    /// Mint transaction submitted; awaiting confirmation.
    Minting,
    /// Mint confirmed on chain.
    Minted,
    /// The provider reported a failure.
    Failed,
    /// The provider rejected the person.
    Rejected,
    /// The identifier has already been used.
    Duplicate,
}

impl VerificationStatus {
    /// Terminal stages; only `reset` leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VerificationStatus::Minted
                | VerificationStatus::Failed
                | VerificationStatus::Rejected
                | VerificationStatus::Duplicate
        )
    }

    /// Stages with an open provider session; `cancel` tears them down.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            VerificationStatus::AwaitingScan | VerificationStatus::Processing
        )
    }
}

/// Everything a presentation layer needs to render one cycle.
///
/// Owned exclusively by the machine; readers get clones. `unique_identifier`
/// is set at most once per cycle and `proofs_generated` never decreases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationState {
    /// Current stage.
    pub status: VerificationStatus,
    /// The provider's per-person identifier; masked in any rendering.
    pub unique_identifier: Option<UniqueIdentifier>,
    /// Whether the provider's face match passed.
    pub face_match_passed: bool,
    /// Whether the provider confirmed unique personhood.
    pub personhood_verified: bool,
    /// Proofs generated so far, capped at the expected count.
    pub proofs_generated: u32,
    /// Whether the user's scan reached the provider.
    pub request_received: bool,
    /// The confirmed mint transaction, set only in `Minted`.
    pub mint_tx_hash: Option<TxHash>,
    /// User-facing message of the last recorded failure.
    pub error_message: Option<String>,
}

impl Default for VerificationState {
    fn default() -> Self {
        Self {
            status: VerificationStatus::Idle,
            unique_identifier: None,
            face_match_passed: false,
            personhood_verified: false,
            proofs_generated: 0,
            request_received: false,
            mint_tx_hash: None,
            error_message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle_and_empty() {
        let state = VerificationState::default();
        assert_eq!(state.status, VerificationStatus::Idle);
        assert!(state.unique_identifier.is_none());
        assert!(!state.face_match_passed);
        assert!(!state.personhood_verified);
        assert_eq!(state.proofs_generated, 0);
        assert!(!state.request_received);
        assert!(state.mint_tx_hash.is_none());
        assert!(state.error_message.is_none());
    }

    #[test]
    fn terminal_and_cancellable_partitions() {
        use VerificationStatus::*;
        for status in [Idle, AwaitingScan, Processing, Verified, Minting] {
            assert!(!status.is_terminal(), "{status:?}");
        }
        for status in [Minted, Failed, Rejected, Duplicate] {
            assert!(status.is_terminal(), "{status:?}");
            assert!(!status.is_cancellable(), "{status:?}");
        }
        assert!(AwaitingScan.is_cancellable());
        assert!(Processing.is_cancellable());
        assert!(!Verified.is_cancellable());
        assert!(!Minting.is_cancellable());
    }
}
