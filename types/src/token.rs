//! Per-cycle session token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token minted for each verification cycle.
///
/// Provider events carry the token of the cycle they belong to; after a
/// reset or cancel the live token changes, so late events from the old
/// cycle compare unequal and are dropped without effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(u64);

impl SessionToken {
    /// Mint a fresh token.
    pub fn mint() -> Self {
        Self(rand::random::<u64>())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_tokens_differ() {
        // Colliding u64s across a handful of draws would indicate a broken RNG.
        let tokens: Vec<SessionToken> = (0..8).map(|_| SessionToken::mint()).collect();
        for (i, a) in tokens.iter().enumerate() {
            for b in &tokens[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn display_is_fixed_width_hex() {
        let token = SessionToken(0x2a);
        assert_eq!(token.to_string(), "000000000000002a");
    }
}
