//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the minter.
//! All types derive Serde traits for deserialization from config files.

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::blockchain::types::ChainId;

/// Root configuration for the minting client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MinterConfig {
    /// The one network the wallet must be on before minting.
    pub network: NetworkDescriptor,

    /// Minting contract binding.
    pub contract: ContractConfig,

    /// Wallet provider discovery.
    pub wallet: WalletConfig,

    /// Confirmation wait settings.
    pub confirmation: ConfirmationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Identity of the target network, in the shape wallets expect for
/// `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkDescriptor {
    /// Chain ID, written as a hex string (e.g. "0x4").
    pub chain_id: ChainId,

    /// Human readable network name shown by the wallet.
    pub name: String,

    /// JSON-RPC endpoint handed to the wallet when it has to add the chain.
    pub rpc_url: String,

    /// Native currency of the network.
    pub currency: NativeCurrency,

    /// Block explorer base URL, used for transaction links.
    pub explorer_url: String,
}

impl Default for NetworkDescriptor {
    fn default() -> Self {
        Self {
            chain_id: ChainId(4),
            name: "Rinkeby Test Network".to_string(),
            rpc_url: "https://rinkeby.infura.io/v3/".to_string(),
            currency: NativeCurrency::default(),
            explorer_url: "https://rinkeby.etherscan.io".to_string(),
        }
    }
}

/// Native currency metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for NativeCurrency {
    fn default() -> Self {
        Self {
            name: "Rinkeby Ether".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }
}

/// Minting contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the deployed NFT contract.
    pub address: Address,

    /// Constant asset tag passed to `mint`.
    pub asset_tag: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: address!("02B3E0e4aC90c711c0e96114f3f090B61D268FAD"),
            asset_tag: "nft".to_string(),
        }
    }
}

/// Wallet provider discovery.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// EIP-1193 JSON-RPC endpoint exposed by the wallet (Frame listens on
    /// 1248 by default). `None` means no wallet is available.
    pub endpoint: Option<String>,

    /// How long to wait for the endpoint to answer during detection.
    pub detect_timeout_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            endpoint: Some("http://127.0.0.1:1248".to_string()),
            detect_timeout_secs: 3,
        }
    }
}

/// Confirmation wait configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Interval between receipt polls.
    pub poll_interval_ms: u64,

    /// Upper bound on the wait. Unset waits for as long as the network takes.
    pub timeout_secs: Option<u64>,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2_000,
            timeout_secs: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: MinterConfig = toml::from_str(
            r#"
            [network]
            chain_id = "0xaa36a7"
            name = "Sepolia"
            "#,
        )
        .unwrap();

        assert_eq!(config.network.chain_id, ChainId(11_155_111));
        assert_eq!(config.network.name, "Sepolia");
        assert_eq!(config.network.currency.decimals, 18);
        assert_eq!(config.contract.asset_tag, "nft");
        assert_eq!(config.confirmation.timeout_secs, None);
    }

    #[test]
    fn test_contract_address_parses_from_string() {
        let config: MinterConfig = toml::from_str(
            r#"
            [contract]
            address = "0x0000000000000000000000000000000000000001"
            "#,
        )
        .unwrap();

        assert_eq!(config.contract.address, Address::with_last_byte(1));
    }
}
