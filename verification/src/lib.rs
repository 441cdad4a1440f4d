//! Identity verification and personhood-gated minting.
//!
//! The flow: open a provider session, show its payload as a QR code, follow
//! the provider's pushed events (scan received, proof progress, terminal
//! outcome), then submit the mint for the verified identifier and await
//! confirmation.
//!
//! The core is split in two:
//! - [`VerificationMachine`] — a pure state machine; every transition is a
//!   synchronous function, testable without any I/O.
//! - [`VerificationPipeline`] — the async driver owning the provider and
//!   submitter seams, feeding events into the machine in arrival order.
//!
//! Cancellation is cooperative: `cancel`/`reset` invalidate the cycle's
//! session token, and late events carrying the old token are dropped on
//! arrival. The pipeline imposes no timeouts; a provider that never reports
//! leaves the cycle in `Processing`.

pub mod error;
pub mod events;
pub mod machine;
pub mod mint;
pub mod pipeline;
pub mod provider;
pub mod state;

pub use error::VerificationError;
pub use events::{ProviderEvent, SessionOutcome};
pub use machine::{EventDisposition, VerificationMachine, DEFAULT_EXPECTED_PROOFS};
pub use mint::{MintOutcome, MintRequest, MintSubmitter};
pub use pipeline::{ScanHandle, VerificationPipeline};
pub use provider::{ProviderSession, SessionId, VerificationProvider};
pub use state::{VerificationState, VerificationStatus};
