use thiserror::Error;

use crate::chain::ChainId;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid hex chain id: {0}")]
    InvalidChainHex(String),

    #[error("invalid transaction hash: {0}")]
    InvalidTxHash(String),

    #[error("chain registry must contain at least one chain")]
    EmptyRegistry,

    #[error("duplicate chain id {0} in registry")]
    DuplicateChain(ChainId),
}
