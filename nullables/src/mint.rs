//! Nullable mint submitter — record submissions without a relayer.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use mintgate_faults::RawFault;
use mintgate_types::TxHash;
use mintgate_verification::{MintRequest, MintSubmitter};

use crate::lock;

/// Hash answered by an unscripted `submit`.
pub const NULL_TX_HASH: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000001";

/// A test relayer that records every submission. Unscripted calls answer
/// the fixed [`NULL_TX_HASH`] and a confirmed transaction.
#[derive(Default)]
pub struct NullMintSubmitter {
    submit_results: Mutex<VecDeque<Result<TxHash, RawFault>>>,
    confirm_results: Mutex<VecDeque<Result<(), RawFault>>>,
    submitted: Mutex<Vec<MintRequest>>,
}

impl NullMintSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `submit` answer.
    pub fn script_submit(&self, result: Result<TxHash, RawFault>) {
        lock(&self.submit_results).push_back(result);
    }

    /// Script the next `await_confirmation` answer.
    pub fn script_confirmation(&self, result: Result<(), RawFault>) {
        lock(&self.confirm_results).push_back(result);
    }

    /// All submitted mint requests, in order.
    pub fn submitted(&self) -> Vec<MintRequest> {
        lock(&self.submitted).clone()
    }
}

#[async_trait]
impl MintSubmitter for NullMintSubmitter {
    async fn submit(&self, request: &MintRequest) -> Result<TxHash, RawFault> {
        lock(&self.submitted).push(request.clone());
        match lock(&self.submit_results).pop_front() {
            Some(result) => result,
            None => TxHash::new(NULL_TX_HASH).map_err(|err| RawFault::from_error(&err)),
        }
    }

    async fn await_confirmation(&self, _hash: &TxHash) -> Result<(), RawFault> {
        lock(&self.confirm_results).pop_front().unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintgate_types::UniqueIdentifier;

    fn request() -> MintRequest {
        MintRequest {
            unique_identifier: UniqueIdentifier::from("0xabc123deadbeef0042"),
            recipient_address: "0xaa".to_string(),
            face_match_passed: true,
            personhood_verified: true,
        }
    }

    #[tokio::test]
    async fn unscripted_submit_answers_the_null_hash() {
        let submitter = NullMintSubmitter::new();
        let hash = submitter.submit(&request()).await.unwrap();
        assert_eq!(hash.as_str(), NULL_TX_HASH);
        assert!(submitter.await_confirmation(&hash).await.is_ok());
        assert_eq!(submitter.submitted().len(), 1);
    }

    #[tokio::test]
    async fn scripted_answers_take_priority() {
        let submitter = NullMintSubmitter::new();
        submitter.script_submit(Err(RawFault::from("relayer offline")));

        assert!(submitter.submit(&request()).await.is_err());
        assert!(submitter.submit(&request()).await.is_ok());
    }
}
