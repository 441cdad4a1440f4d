//! The opaque per-person identifier returned by the verification provider.
//!
//! The full value is required for the mint call, but any user-facing
//! rendering must mask it. Both `Display` and `Debug` therefore always
//! render the masked form; the full value is only readable via
//! [`UniqueIdentifier::expose`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// How many leading characters [`UniqueIdentifier::masked`] reveals.
const MASK_PREFIX: usize = 6;
/// How many trailing characters [`UniqueIdentifier::masked`] reveals.
const MASK_SUFFIX: usize = 4;

/// Opaque unique-personhood identifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueIdentifier(String);

impl UniqueIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The full identifier, for the mint call only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked rendering: first 6 and last 4 characters, `…` between.
    ///
    /// Values short enough that prefix + suffix would reveal everything
    /// are masked entirely.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= MASK_PREFIX + MASK_SUFFIX {
            return "…".to_string();
        }
        let prefix: String = chars[..MASK_PREFIX].iter().collect();
        let suffix: String = chars[chars.len() - MASK_SUFFIX..].iter().collect();
        format!("{prefix}…{suffix}")
    }
}

impl From<String> for UniqueIdentifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UniqueIdentifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for UniqueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl fmt::Debug for UniqueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UniqueIdentifier({})", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_middle_of_long_identifier() {
        let uid = UniqueIdentifier::new("0xabc123deadbeef0042");
        assert_eq!(uid.masked(), "0xabc1…0042");
    }

    #[test]
    fn short_identifier_fully_masked() {
        assert_eq!(UniqueIdentifier::new("0xabc10042").masked(), "…");
        assert_eq!(UniqueIdentifier::new("").masked(), "…");
    }

    #[test]
    fn boundary_length_fully_masked() {
        // Exactly prefix + suffix characters: revealing both would reveal all.
        assert_eq!(UniqueIdentifier::new("abcdefghij").masked(), "…");
        assert_eq!(UniqueIdentifier::new("abcdefghijk").masked(), "abcdef…hijk");
    }

    #[test]
    fn display_and_debug_never_reveal_full_value() {
        let uid = UniqueIdentifier::new("0xabc123deadbeef0042");
        assert!(!format!("{uid}").contains("deadbeef"));
        assert!(!format!("{uid:?}").contains("deadbeef"));
    }

    #[test]
    fn expose_returns_full_value() {
        let uid = UniqueIdentifier::new("0xabc123deadbeef0042");
        assert_eq!(uid.expose(), "0xabc123deadbeef0042");
    }
}
