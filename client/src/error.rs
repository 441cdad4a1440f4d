//! Transport construction errors.

use thiserror::Error;

/// Raised while building a transport, before any request is made.
///
/// Runtime failures travel as [`mintgate_faults::RawFault`] through the
/// trait seams instead, so the classifier sees them in original shape.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
