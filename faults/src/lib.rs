//! Failure classification.
//!
//! Wallet bridges, verification providers, and contract calls all fail in
//! their own shapes. This crate normalizes every failure into one taxonomy:
//! a [`FaultCode`], a fixed user-facing message, and a recoverability
//! verdict, so callers render errors uniformly and decide whether a retry
//! is worth offering.
//!
//! [`RawFault`] also carries the two wallet-protocol predicates the chain
//! session manager branches on: user rejection (always swallowed) and
//! chain-unrecognized (triggers the add-chain fallback).

pub mod classify;
pub mod code;
pub mod raw;
pub mod rules;

pub use classify::{classify, FaultReport};
pub use code::FaultCode;
pub use raw::{RawFault, CODE_CHAIN_UNRECOGNIZED, CODE_INTERNAL_ERROR, CODE_USER_REJECTED};
