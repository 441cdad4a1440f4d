//! The fixed set of supported chains.

use crate::chain::{ChainDescriptor, ChainId, NativeCurrency};
use crate::error::TypeError;

/// Immutable registry of supported chain descriptors.
///
/// Built once at startup; iteration order is the configured order, which is
/// also the display order.
#[derive(Clone, Debug)]
pub struct ChainRegistry {
    chains: Vec<ChainDescriptor>,
}

impl ChainRegistry {
    /// Build a registry from descriptors, rejecting duplicates and empties.
    pub fn from_descriptors(chains: Vec<ChainDescriptor>) -> Result<Self, TypeError> {
        if chains.is_empty() {
            return Err(TypeError::EmptyRegistry);
        }
        for (i, desc) in chains.iter().enumerate() {
            if chains[..i].iter().any(|other| other.id == desc.id) {
                return Err(TypeError::DuplicateChain(desc.id));
            }
        }
        Ok(Self { chains })
    }

    /// The standard four supported chains.
    ///
    /// Unichain and Celo are marked `add_first`: wallets commonly ship
    /// without them, so the session manager adds before switching.
    pub fn standard() -> Self {
        Self {
            chains: vec![
                ChainDescriptor {
                    id: ChainId::new(1),
                    name: "Ethereum".into(),
                    native_currency: NativeCurrency::ether(),
                    rpc_urls: vec!["https://eth.llamarpc.com".into()],
                    block_explorer_urls: vec!["https://etherscan.io".into()],
                    add_first: false,
                },
                ChainDescriptor {
                    id: ChainId::new(8453),
                    name: "Base".into(),
                    native_currency: NativeCurrency::ether(),
                    rpc_urls: vec!["https://mainnet.base.org".into()],
                    block_explorer_urls: vec!["https://basescan.org".into()],
                    add_first: false,
                },
                ChainDescriptor {
                    id: ChainId::new(130),
                    name: "Unichain".into(),
                    native_currency: NativeCurrency::ether(),
                    rpc_urls: vec!["https://mainnet.unichain.org".into()],
                    block_explorer_urls: vec!["https://uniscan.xyz".into()],
                    add_first: true,
                },
                ChainDescriptor {
                    id: ChainId::new(42220),
                    name: "Celo".into(),
                    native_currency: NativeCurrency::new("Celo", "CELO", 18),
                    rpc_urls: vec!["https://forno.celo.org".into()],
                    block_explorer_urls: vec!["https://celoscan.io".into()],
                    add_first: true,
                },
            ],
        }
    }

    pub fn get(&self, id: ChainId) -> Option<&ChainDescriptor> {
        self.chains.iter().find(|desc| desc.id == id)
    }

    pub fn contains(&self, id: ChainId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains.iter()
    }

    pub fn ids(&self) -> Vec<ChainId> {
        self.chains.iter().map(|desc| desc.id).collect()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
