//! The mint-submission seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mintgate_faults::{FaultReport, RawFault};
use mintgate_types::{TxHash, UniqueIdentifier};

/// Submission payload for the personhood-gated mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub unique_identifier: UniqueIdentifier,
    pub recipient_address: String,
    pub face_match_passed: bool,
    pub personhood_verified: bool,
}

/// Relays mint transactions on behalf of the user.
///
/// The relayer accepts a submission only after a privileged approver has
/// approved the verification result off-chain; unapproved submissions come
/// back as ordinary classifiable failures.
#[async_trait]
pub trait MintSubmitter: Send + Sync {
    /// Submit the mint; resolves with the transaction hash on acceptance.
    async fn submit(&self, request: &MintRequest) -> Result<TxHash, RawFault>;

    /// Resolve once the transaction confirms or fails on chain.
    async fn await_confirmation(&self, hash: &TxHash) -> Result<(), RawFault>;
}

/// How a mint attempt ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MintOutcome {
    /// Confirmed on chain; the cycle is `Minted`.
    Minted(TxHash),
    /// Classified failure recorded on the cycle, which is back in
    /// `Verified`; the mint can be retried.
    Failed(FaultReport),
    /// The user declined the transaction in the wallet; the cycle is back
    /// in `Verified` with nothing recorded.
    Cancelled,
}
