//! The wallet RPC surface the session manager speaks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mintgate_faults::RawFault;
use mintgate_types::{ChainDescriptor, ChainId, NativeCurrency};

/// `wallet_switchEthereumChain` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainRequest {
    /// Hex chain id, e.g. `"0x82"`.
    pub chain_id: String,
}

impl SwitchChainRequest {
    pub fn new(id: ChainId) -> Self {
        Self {
            chain_id: id.as_hex(),
        }
    }
}

/// `wallet_addEthereumChain` payload, built from a configured descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainRequest {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl AddChainRequest {
    pub fn from_descriptor(descriptor: &ChainDescriptor) -> Self {
        Self {
            chain_id: descriptor.id.as_hex(),
            chain_name: descriptor.name.clone(),
            native_currency: descriptor.native_currency.clone(),
            rpc_urls: descriptor.rpc_urls.clone(),
            block_explorer_urls: descriptor.block_explorer_urls.clone(),
        }
    }
}

/// A wallet capable of switching its active chain and learning new ones.
///
/// Both calls resolve once the wallet confirms or rejects. Failures come
/// back exactly as the wallet reported them, so the session manager's
/// predicates and the classifier can inspect the original shape.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn switch_chain(&self, request: SwitchChainRequest) -> Result<(), RawFault>;
    async fn add_chain(&self, request: AddChainRequest) -> Result<(), RawFault>;
}
