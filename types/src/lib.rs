//! Fundamental types for the MINTGATE session core.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: chain identifiers and descriptors, the fixed chain registry,
//! the opaque personhood identifier, transaction hashes, and the per-cycle
//! session token.

pub mod chain;
pub mod error;
pub mod identifier;
pub mod registry;
pub mod token;
pub mod tx;

pub use chain::{ChainDescriptor, ChainId, NativeCurrency};
pub use error::TypeError;
pub use identifier::UniqueIdentifier;
pub use registry::ChainRegistry;
pub use token::SessionToken;
pub use tx::TxHash;
