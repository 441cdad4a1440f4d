//! Multi-chain wallet session management.
//!
//! A [`ChainSessionManager`] owns the wallet's active-chain state and
//! negotiates switches over the add-then-switch fallback protocol:
//! uncommon chains are added before switching, an unrecognized-chain answer
//! triggers an add plus one switch retry, and user rejection anywhere ends
//! the negotiation silently. Subscribers learn about committed switches
//! through a broadcast channel.

pub mod error;
pub mod provider;
pub mod session;

pub use error::ChainError;
pub use provider::{AddChainRequest, SwitchChainRequest, WalletProvider};
pub use session::{ChainSessionManager, SwitchOutcome};
