//! The ordered classification rule table.

use crate::code::FaultCode;

/// Message fragments wallets use for a user declining a request.
pub(crate) const USER_REJECTION_NEEDLES: &[&str] = &[
    "user rejected",
    "user denied",
    "rejected by user",
    "user cancelled",
    "user canceled",
];

/// One classification rule: any needle present assigns the code.
pub type Rule = (&'static [&'static str], FaultCode);

/// Evaluated top to bottom; the first rule with a matching needle wins.
/// Matching is case-insensitive substring search over the extracted message,
/// so every needle must be lowercase.
///
/// The bare revert rule sits below the domain rules: a revert reason
/// classifies by its cause, so "execution reverted: already claimed" lands
/// on `AlreadyClaimed` rather than `ExecutionReverted`.
pub static RULES: &[Rule] = &[
    (USER_REJECTION_NEEDLES, FaultCode::UserRejected),
    (
        &[
            "insufficient funds",
            "insufficient balance",
            "out of gas",
            "gas required exceeds",
        ],
        FaultCode::InsufficientFunds,
    ),
    (
        &[
            "network error",
            "timed out",
            "timeout",
            "connection refused",
            "connection reset",
            "failed to fetch",
            "disconnected",
        ],
        FaultCode::NetworkError,
    ),
    (
        &[
            "wrong network",
            "wrong chain",
            "chain mismatch",
            "unsupported chainid",
            "unrecognized chain",
            "chain not found",
            "unknown chain",
        ],
        FaultCode::ChainMismatch,
    ),
    (
        &[
            "nonce too low",
            "nonce too high",
            "invalid nonce",
            "nonce has already been used",
        ],
        FaultCode::NonceError,
    ),
    (
        &["replacement transaction underpriced", "replacement underpriced"],
        FaultCode::ReplacementUnderpriced,
    ),
    (
        &[
            "invalid address",
            "invalid recipient",
            "bad address",
            "invalid checksum",
        ],
        FaultCode::InvalidAddress,
    ),
    (&["invalid amount", "amount must be"], FaultCode::InvalidAmount),
    (
        &["already claimed", "has already claimed"],
        FaultCode::AlreadyClaimed,
    ),
    (
        &[
            "not whitelisted",
            "not on the whitelist",
            "not allowlisted",
            "not eligible",
        ],
        FaultCode::NotWhitelisted,
    ),
    (
        &["cooldown", "too soon to claim", "claim too early"],
        FaultCode::ClaimCooldown,
    ),
    (
        &["already redeemed", "already been redeemed"],
        FaultCode::AlreadyRedeemed,
    ),
    (
        &["invalid signature", "signature mismatch", "bad signature"],
        FaultCode::InvalidSignature,
    ),
    (
        &[
            "verification failed",
            "verification error",
            "verification unsuccessful",
        ],
        FaultCode::VerificationFailed,
    ),
    (&["already verified"], FaultCode::AlreadyVerified),
    (
        &["invalid proof", "proof invalid", "proof rejected"],
        FaultCode::ProofInvalid,
    ),
    (&["revert", "call exception"], FaultCode::ExecutionReverted),
    (
        &["rate limit", "rate-limited", "too many requests"],
        FaultCode::RateLimited,
    ),
];

/// Walk the table; unmatched messages land on `Unknown`.
pub fn match_message(message: &str) -> FaultCode {
    let lowered = message.to_lowercase();
    for (needles, code) in RULES {
        if contains_any(&lowered, needles) {
            return *code;
        }
    }
    FaultCode::Unknown
}

/// Any-needle containment over an already-lowercased message.
pub(crate) fn contains_any(lowered: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| lowered.contains(needle))
}
