use thiserror::Error;

use mintgate_faults::FaultReport;
use mintgate_types::ChainId;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain {0} is not configured")]
    ChainNotConfigured(ChainId),

    #[error("{0}")]
    Switch(FaultReport),
}
