//! The wallet provider capability.
//!
//! A [`WalletProvider`] is the request/response surface a wallet exposes to
//! applications (EIP-1193). Both the connection manager and the mint
//! orchestrator receive it explicitly as `Arc<dyn WalletProvider>`, so tests
//! can substitute a scripted fake.

use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::blockchain::types::{
    ChainId, Inclusion, NetworkDescriptor, UNRECOGNIZED_CHAIN_CODE, USER_REJECTED_CODE,
};

/// Failures reported by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The user declined the request in the wallet UI.
    #[error("Request rejected by user")]
    UserRejected,

    /// The wallet does not know the requested chain and must be told about it.
    #[error("Chain is not known to the wallet")]
    ChainUnknownToProvider,

    /// Any other JSON-RPC error response.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The wallet endpoint could not be reached or answered garbage.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The configured wallet endpoint is not a usable URL.
    #[error("Invalid wallet endpoint '{0}'")]
    InvalidEndpoint(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WrappedError {
    original_error: Option<WrappedCode>,
}

#[derive(Deserialize)]
struct WrappedCode {
    code: i64,
}

impl ProviderError {
    /// Classify a JSON-RPC error payload.
    ///
    /// Some mobile wallets report an unknown chain as `-32603` and tuck the
    /// real 4902 into `data.originalError.code`; that form is unwrapped too.
    pub fn from_rpc(code: i64, message: impl Into<String>, data: Option<&str>) -> Self {
        let code = match data.and_then(|raw| serde_json::from_str::<WrappedError>(raw).ok()) {
            Some(WrappedError {
                original_error: Some(inner),
            }) => inner.code,
            _ => code,
        };

        match code {
            USER_REJECTED_CODE => Self::UserRejected,
            UNRECOGNIZED_CHAIN_CODE => Self::ChainUnknownToProvider,
            _ => Self::Rpc {
                code,
                message: message.into(),
            },
        }
    }

    /// Whether the user actively declined.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::UserRejected)
    }
}

/// Result type for provider requests.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Requests an application may make of an injected wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorized for this application (`eth_accounts`).
    /// Never prompts the user.
    async fn accounts(&self) -> ProviderResult<Vec<Address>>;

    /// Ask the user to authorize accounts (`eth_requestAccounts`). May
    /// suspend until the user answers the wallet prompt.
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>>;

    /// The wallet's active chain (`eth_chainId`).
    async fn chain_id(&self) -> ProviderResult<ChainId>;

    /// Switch the wallet's active chain (`wallet_switchEthereumChain`).
    async fn switch_chain(&self, chain_id: ChainId) -> ProviderResult<()>;

    /// Teach the wallet a chain definition (`wallet_addEthereumChain`).
    async fn add_chain(&self, network: &NetworkDescriptor) -> ProviderResult<()>;

    /// Have the wallet sign and broadcast a transaction (`eth_sendTransaction`).
    async fn send_transaction(&self, tx: TransactionRequest) -> ProviderResult<TxHash>;

    /// Inclusion status of a transaction, `None` while it is still pending.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> ProviderResult<Option<Inclusion>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(
            ProviderError::from_rpc(4001, "User rejected the request.", None),
            ProviderError::UserRejected
        );
        assert_eq!(
            ProviderError::from_rpc(4902, "Unrecognized chain ID", None),
            ProviderError::ChainUnknownToProvider
        );
    }

    #[test]
    fn test_other_codes_keep_message() {
        let err = ProviderError::from_rpc(-32002, "Request already pending", None);
        assert_eq!(
            err,
            ProviderError::Rpc {
                code: -32002,
                message: "Request already pending".to_string()
            }
        );
        assert!(!err.is_user_rejection());
    }

    #[test]
    fn test_wrapped_unknown_chain() {
        let data = r#"{"originalError":{"code":4902,"message":"Unrecognized chain ID"}}"#;
        assert_eq!(
            ProviderError::from_rpc(-32603, "Internal error", Some(data)),
            ProviderError::ChainUnknownToProvider
        );
    }

    #[test]
    fn test_unrelated_data_is_ignored() {
        let err = ProviderError::from_rpc(-32603, "Internal error", Some("\"0xdead\""));
        assert!(matches!(err, ProviderError::Rpc { code: -32603, .. }));
    }
}
