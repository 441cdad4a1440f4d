//! Chain identifiers and descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;
use crate::tx::TxHash;

/// An EVM chain id.
///
/// Rendered as decimal for humans and as `0x`-prefixed hex on the wallet
/// wire (`wallet_switchEthereumChain` takes hex chain ids).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u64);

impl ChainId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Lowercase hex with `0x` prefix and no leading zeros (`130` → `"0x82"`).
    pub fn as_hex(&self) -> String {
        format!("{:#x}", self.0)
    }

    /// Parse a `0x`-prefixed hex chain id.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| TypeError::InvalidChainHex(s.to_string()))?;
        if body.is_empty() {
            return Err(TypeError::InvalidChainHex(s.to_string()));
        }
        u64::from_str_radix(body, 16)
            .map(Self)
            .map_err(|_| TypeError::InvalidChainHex(s.to_string()))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The native currency of a chain, as presented to the wallet on `addChain`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NativeCurrency {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// The 18-decimal ether currency shared by most EVM chains.
    pub fn ether() -> Self {
        Self::new("Ether", "ETH", 18)
    }
}

/// Static description of a supported chain.
///
/// Configured once at startup and never mutated. `add_first` marks the
/// uncommon chains that get an `addChain` attempt before every switch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    pub id: ChainId,
    pub name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
    #[serde(default)]
    pub add_first: bool,
}

impl ChainDescriptor {
    /// Transaction link for this chain's primary block explorer
    /// (`{explorer}/tx/{hash}`), or `None` if no explorer is configured.
    pub fn explorer_tx_url(&self, hash: &TxHash) -> Option<String> {
        let base = self.block_explorer_urls.first()?;
        Some(format!("{}/tx/{}", base.trim_end_matches('/'), hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_hex_rendering() {
        assert_eq!(ChainId::new(1).as_hex(), "0x1");
        assert_eq!(ChainId::new(130).as_hex(), "0x82");
        assert_eq!(ChainId::new(8453).as_hex(), "0x2105");
        assert_eq!(ChainId::new(42220).as_hex(), "0xa4ec");
    }

    #[test]
    fn chain_id_from_hex() {
        assert_eq!(ChainId::from_hex("0x82").unwrap(), ChainId::new(130));
        assert_eq!(ChainId::from_hex("0X2105").unwrap(), ChainId::new(8453));
        assert!(ChainId::from_hex("0x").is_err());
        assert!(ChainId::from_hex("82").is_err());
        assert!(ChainId::from_hex("0xzz").is_err());
    }

    #[test]
    fn chain_id_display_is_decimal() {
        assert_eq!(ChainId::new(42220).to_string(), "42220");
    }

    #[test]
    fn explorer_tx_url_joins_cleanly() {
        let mut desc = ChainDescriptor {
            id: ChainId::new(1),
            name: "Ethereum".into(),
            native_currency: NativeCurrency::ether(),
            rpc_urls: vec!["https://eth.llamarpc.com".into()],
            block_explorer_urls: vec!["https://etherscan.io/".into()],
            add_first: false,
        };
        let hash = TxHash::new("0xdeadbeef").unwrap();
        assert_eq!(
            desc.explorer_tx_url(&hash).unwrap(),
            "https://etherscan.io/tx/0xdeadbeef"
        );

        desc.block_explorer_urls.clear();
        assert!(desc.explorer_tx_url(&hash).is_none());
    }

    #[test]
    fn descriptor_toml_round_trip() {
        let desc = ChainDescriptor {
            id: ChainId::new(130),
            name: "Unichain".into(),
            native_currency: NativeCurrency::ether(),
            rpc_urls: vec!["https://mainnet.unichain.org".into()],
            block_explorer_urls: vec!["https://uniscan.xyz".into()],
            add_first: true,
        };
        let toml_str = toml::to_string(&desc).unwrap();
        let parsed: ChainDescriptor = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, desc);
    }
}
