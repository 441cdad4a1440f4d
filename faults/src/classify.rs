//! Classification entry point.

use std::fmt;

use crate::code::FaultCode;
use crate::raw::RawFault;
use crate::rules::match_message;

/// A classified failure, ready for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaultReport {
    pub code: FaultCode,
    /// Fixed text for this code; the only string ever rendered to the user.
    pub user_message: &'static str,
    /// The extracted raw message, attached in debug builds only.
    pub raw_message: Option<String>,
    pub recoverable: bool,
}

impl fmt::Display for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message)
    }
}

impl std::error::Error for FaultReport {}

/// Classify a raw failure into a [`FaultReport`].
///
/// Wallet code 4001 short-circuits to `UserRejected` before the message
/// rules run; everything else goes through the ordered rule table.
pub fn classify(raw: &RawFault) -> FaultReport {
    let message = raw.message();
    let code = if raw.wallet_code() == Some(crate::raw::CODE_USER_REJECTED) {
        FaultCode::UserRejected
    } else {
        match_message(&message)
    };
    FaultReport {
        code,
        user_message: code.user_message(),
        raw_message: cfg!(debug_assertions).then_some(message),
        recoverable: code.recoverable(),
    }
}
