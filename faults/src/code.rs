//! The failure taxonomy.

/// Every classified failure lands on exactly one of these codes.
///
/// Codes cover the wallet surface (rejection, chain state), the transport
/// (network), contract execution, input validation, the mint-contract domain
/// rules, and a default for everything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultCode {
    UserRejected,
    InsufficientFunds,
    NetworkError,
    ChainMismatch,
    NonceError,
    ReplacementUnderpriced,
    ExecutionReverted,
    InvalidAddress,
    InvalidAmount,
    AlreadyClaimed,
    NotWhitelisted,
    ClaimCooldown,
    AlreadyRedeemed,
    InvalidSignature,
    VerificationFailed,
    AlreadyVerified,
    ProofInvalid,
    RateLimited,
    Unknown,
}

impl FaultCode {
    /// Every code, in declaration order.
    pub const ALL: [FaultCode; 19] = [
        FaultCode::UserRejected,
        FaultCode::InsufficientFunds,
        FaultCode::NetworkError,
        FaultCode::ChainMismatch,
        FaultCode::NonceError,
        FaultCode::ReplacementUnderpriced,
        FaultCode::ExecutionReverted,
        FaultCode::InvalidAddress,
        FaultCode::InvalidAmount,
        FaultCode::AlreadyClaimed,
        FaultCode::NotWhitelisted,
        FaultCode::ClaimCooldown,
        FaultCode::AlreadyRedeemed,
        FaultCode::InvalidSignature,
        FaultCode::VerificationFailed,
        FaultCode::AlreadyVerified,
        FaultCode::ProofInvalid,
        FaultCode::RateLimited,
        FaultCode::Unknown,
    ];

    /// Whether retrying the same user action can plausibly succeed.
    ///
    /// False only for the permanent domain-rule outcomes; everything else,
    /// including `Unknown`, is worth retrying.
    pub fn recoverable(&self) -> bool {
        !matches!(
            self,
            FaultCode::AlreadyClaimed
                | FaultCode::NotWhitelisted
                | FaultCode::AlreadyRedeemed
                | FaultCode::AlreadyVerified
        )
    }

    /// Fixed user-facing message for this code.
    pub fn user_message(&self) -> &'static str {
        match self {
            FaultCode::UserRejected => "The request was cancelled in your wallet.",
            FaultCode::InsufficientFunds => {
                "Insufficient funds to cover this transaction and its gas."
            }
            FaultCode::NetworkError => {
                "A network error occurred. Check your connection and try again."
            }
            FaultCode::ChainMismatch => {
                "Your wallet is on the wrong network. Switch chains and try again."
            }
            FaultCode::NonceError => {
                "Transaction ordering problem. Clear pending transactions in your wallet and retry."
            }
            FaultCode::ReplacementUnderpriced => {
                "A pending transaction is blocking this one. Wait for it or speed it up, then retry."
            }
            FaultCode::ExecutionReverted => "The transaction was reverted by the contract.",
            FaultCode::InvalidAddress => "The recipient address is not valid.",
            FaultCode::InvalidAmount => "The amount entered is not valid.",
            FaultCode::AlreadyClaimed => "This identity has already claimed.",
            FaultCode::NotWhitelisted => "This address is not on the allowlist.",
            FaultCode::ClaimCooldown => "Claiming is on cooldown for this identity. Try again later.",
            FaultCode::AlreadyRedeemed => "This claim has already been redeemed.",
            FaultCode::InvalidSignature => "The approval signature is not valid. Restart verification.",
            FaultCode::VerificationFailed => "Identity verification failed. Please try again.",
            FaultCode::AlreadyVerified => "This identity has already been verified.",
            FaultCode::ProofInvalid => "The verification proof was rejected. Restart verification.",
            FaultCode::RateLimited => "Too many requests. Wait a moment and try again.",
            FaultCode::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Stable SCREAMING_SNAKE code string for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultCode::UserRejected => "USER_REJECTED",
            FaultCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            FaultCode::NetworkError => "NETWORK_ERROR",
            FaultCode::ChainMismatch => "CHAIN_MISMATCH",
            FaultCode::NonceError => "NONCE_ERROR",
            FaultCode::ReplacementUnderpriced => "REPLACEMENT_UNDERPRICED",
            FaultCode::ExecutionReverted => "EXECUTION_REVERTED",
            FaultCode::InvalidAddress => "INVALID_ADDRESS",
            FaultCode::InvalidAmount => "INVALID_AMOUNT",
            FaultCode::AlreadyClaimed => "ALREADY_CLAIMED",
            FaultCode::NotWhitelisted => "NOT_WHITELISTED",
            FaultCode::ClaimCooldown => "CLAIM_COOLDOWN",
            FaultCode::AlreadyRedeemed => "ALREADY_REDEEMED",
            FaultCode::InvalidSignature => "INVALID_SIGNATURE",
            FaultCode::VerificationFailed => "VERIFICATION_FAILED",
            FaultCode::AlreadyVerified => "ALREADY_VERIFIED",
            FaultCode::ProofInvalid => "PROOF_INVALID",
            FaultCode::RateLimited => "RATE_LIMITED",
            FaultCode::Unknown => "UNKNOWN_ERROR",
        }
    }
}
