//! Chain-specific types and error definitions.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export NetworkDescriptor from config module to avoid duplication
pub use crate::config::schema::NetworkDescriptor;

use crate::blockchain::provider::ProviderError;

/// EIP-1193 code for a request the user declined in the wallet.
pub const USER_REJECTED_CODE: i64 = 4001;

/// EIP-3326 code returned by `wallet_switchEthereumChain` for a chain the
/// wallet has never been told about.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Chain ID type for strong typing.
///
/// Wallets report chain ids as hex strings and configs may use either hex or
/// decimal. Both are normalized to the numeric value so that `"0x4"`, `"0x04"`
/// and `"4"` compare equal; `Display` renders the canonical `0x` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainId(pub u64);

impl ChainId {
    /// Canonical lowercase hex form, as used in wallet RPC params.
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Chain id text that is neither hex nor decimal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid chain id '{0}'")]
pub struct ParseChainIdError(pub String);

impl FromStr for ChainId {
    type Err = ParseChainIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(Self)
            .map_err(|_| ParseChainIdError(s.to_string()))
    }
}

impl TryFrom<String> for ChainId {
    type Error = ParseChainIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChainId> for String {
    fn from(id: ChainId) -> Self {
        id.to_hex()
    }
}

/// Inclusion of a transaction in a block, as read from its receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inclusion {
    /// Block the transaction was included in.
    pub block_number: u64,
    /// `false` when execution reverted.
    pub success: bool,
}

/// EIP-3085 `wallet_addEthereumChain` parameter object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: CurrencyParams,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

/// Native currency entry of [`AddChainParams`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl From<&NetworkDescriptor> for AddChainParams {
    fn from(network: &NetworkDescriptor) -> Self {
        Self {
            chain_id: network.chain_id.to_hex(),
            chain_name: network.name.clone(),
            native_currency: CurrencyParams {
                name: network.currency.name.clone(),
                symbol: network.currency.symbol.clone(),
                decimals: network.currency.decimals,
            },
            rpc_urls: vec![network.rpc_url.clone()],
            block_explorer_urls: vec![network.explorer_url.clone()],
        }
    }
}

/// Errors that can occur while driving a transaction on chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockchainError {
    /// The wallet provider failed or refused the request.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Transaction was reverted on-chain.
    #[error("Transaction {tx_hash} reverted in block {block_number}")]
    Reverted { tx_hash: TxHash, block_number: u64 },

    /// Transaction was not included within the configured bound.
    #[error("Transaction {tx_hash} not confirmed within {limit:?}")]
    ConfirmationTimeout { tx_hash: TxHash, limit: Duration },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(1u64);
        assert_eq!(chain_id.0, 1);
        assert_eq!(u64::from(chain_id), 1);
    }

    #[test]
    fn test_chain_id_normalizes_hex_and_decimal() {
        let a: ChainId = "0x4".parse().unwrap();
        let b: ChainId = "0x04".parse().unwrap();
        let c: ChainId = "4".parse().unwrap();
        let d: ChainId = "0X4".parse().unwrap();
        assert_eq!(a, ChainId(4));
        assert!(a == b && b == c && c == d);
        assert_eq!(a.to_string(), "0x4");
        assert_eq!(ChainId(11_155_111).to_hex(), "0xaa36a7");
    }

    #[test]
    fn test_chain_id_rejects_garbage() {
        assert!("rinkeby".parse::<ChainId>().is_err());
        assert!("0x".parse::<ChainId>().is_err());
        assert!("".parse::<ChainId>().is_err());
    }

    #[test]
    fn test_add_chain_params_shape() {
        let network = NetworkDescriptor::default();
        let params = serde_json::to_value(AddChainParams::from(&network)).unwrap();
        assert_eq!(params["chainId"], "0x4");
        assert_eq!(params["chainName"], "Rinkeby Test Network");
        assert_eq!(params["nativeCurrency"]["decimals"], 18);
        assert_eq!(params["rpcUrls"][0], network.rpc_url.as_str());
        assert_eq!(params["blockExplorerUrls"][0], "https://rinkeby.etherscan.io");
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::ConfirmationTimeout {
            tx_hash: TxHash::ZERO,
            limit: Duration::from_secs(30),
        };
        assert!(err.to_string().ends_with("not confirmed within 30s"));

        let err = BlockchainError::from(ProviderError::UserRejected);
        assert_eq!(err.to_string(), ProviderError::UserRejected.to_string());
    }
}
