//! Shared utilities for the MINTGATE session core.

pub mod logging;

pub use logging::init_tracing;
