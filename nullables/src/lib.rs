//! Nullable collaborators for deterministic testing.
//!
//! Every external seam (wallet provider, verification provider, mint
//! relayer) has a stand-in here that:
//! - Returns deterministic values
//! - Can be scripted programmatically, call by call
//! - Records every call for assertions
//! - Never touches the network
//!
//! Usage: swap the real transports for nullables in tests and offline runs.

use std::sync::{Mutex, MutexGuard};

pub mod mint;
pub mod verification;
pub mod wallet;

pub use mint::NullMintSubmitter;
pub use verification::NullVerificationProvider;
pub use wallet::NullWalletProvider;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
