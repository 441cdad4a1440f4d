//! Reference transports for the MINTGATE collaborator seams.
//!
//! Production deployments speak to three external services: a wallet
//! bridge (JSON-RPC over HTTP), the verification service (WebSocket), and
//! the mint relayer (HTTP). Each transport here implements the matching
//! trait seam; the nullables crate provides in-process stand-ins for
//! offline runs and tests.

pub mod config;
pub mod error;
pub mod relayer;
pub mod rpc;
pub mod ws;

pub use config::ClientConfig;
pub use error::ClientError;
pub use relayer::HttpMintSubmitter;
pub use rpc::RpcWalletProvider;
pub use ws::WsVerificationProvider;
