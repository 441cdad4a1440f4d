use thiserror::Error;

use mintgate_faults::FaultReport;

use crate::state::VerificationStatus;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("operation requires {expected}, but the cycle is {actual:?}")]
    WrongStatus {
        expected: &'static str,
        actual: VerificationStatus,
    },

    #[error("verification provider error: {0}")]
    Provider(FaultReport),

    #[error("mint submission error: {0}")]
    Submit(FaultReport),
}
