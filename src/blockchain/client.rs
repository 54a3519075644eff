//! JSON-RPC wallet provider.
//!
//! # Responsibilities
//! - Connect to a wallet's EIP-1193 JSON-RPC endpoint
//! - Translate provider capability calls into wallet RPC methods
//! - Map JSON-RPC error payloads onto [`ProviderError`]
//! - Detect whether a wallet is present at all

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportError;
use async_trait::async_trait;
use serde_json::json;
use tokio::time::timeout;

use crate::blockchain::provider::{ProviderError, ProviderResult, WalletProvider};
use crate::blockchain::types::{AddChainParams, ChainId, Inclusion, NetworkDescriptor};
use crate::config::schema::WalletConfig;

/// Wallet provider reached over HTTP JSON-RPC.
///
/// Desktop wallets such as Frame expose the same request surface a browser
/// extension injects, so every call is forwarded verbatim and the wallet owns
/// signing, prompts and account selection.
#[derive(Clone)]
pub struct RpcWalletProvider {
    inner: Arc<dyn Provider + Send + Sync>,
    endpoint: String,
}

impl RpcWalletProvider {
    /// Create a provider for the given endpoint. No request is made.
    ///
    /// # Arguments
    /// * `endpoint` - HTTP URL of the wallet's JSON-RPC server
    ///
    /// # Returns
    /// A provider, or [`ProviderError::InvalidEndpoint`] if the URL does not parse
    pub fn connect(endpoint: &str) -> ProviderResult<Self> {
        let url: url::Url = endpoint
            .parse()
            .map_err(|_| ProviderError::InvalidEndpoint(endpoint.to_string()))?;

        let inner = ProviderBuilder::new().connect_http(url);
        Ok(Self {
            inner: Arc::new(inner),
            endpoint: endpoint.to_string(),
        })
    }

    /// The endpoint this provider talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn map_transport(err: TransportError) -> ProviderError {
    match err.as_error_resp() {
        Some(payload) => ProviderError::from_rpc(
            payload.code,
            payload.message.to_string(),
            payload.data.as_deref().map(|raw| raw.get()),
        ),
        None => ProviderError::Transport(err.to_string()),
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        self.inner.get_accounts().await.map_err(map_transport)
    }

    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        self.inner
            .client()
            .request_noparams::<Vec<Address>>("eth_requestAccounts")
            .await
            .map_err(map_transport)
    }

    async fn chain_id(&self) -> ProviderResult<ChainId> {
        self.inner
            .get_chain_id()
            .await
            .map(ChainId)
            .map_err(map_transport)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> ProviderResult<()> {
        self.inner
            .client()
            .request::<_, serde_json::Value>(
                "wallet_switchEthereumChain",
                json!([{ "chainId": chain_id.to_hex() }]),
            )
            .await
            .map(|_| ())
            .map_err(map_transport)
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> ProviderResult<()> {
        self.inner
            .client()
            .request::<_, serde_json::Value>(
                "wallet_addEthereumChain",
                (AddChainParams::from(network),),
            )
            .await
            .map(|_| ())
            .map_err(map_transport)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> ProviderResult<TxHash> {
        self.inner
            .client()
            .request::<_, TxHash>("eth_sendTransaction", (tx,))
            .await
            .map_err(map_transport)
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> ProviderResult<Option<Inclusion>> {
        let receipt = self
            .inner
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(map_transport)?;

        Ok(receipt.map(|r| Inclusion {
            block_number: r.block_number.unwrap_or_default(),
            success: r.status(),
        }))
    }
}

impl std::fmt::Debug for RpcWalletProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcWalletProvider")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Look for a wallet at the configured endpoint.
///
/// Returns `None` when no endpoint is configured, or when the endpoint does
/// not answer `eth_chainId` within the detection timeout. A wallet that
/// answers with an RPC error is still present.
pub async fn detect_provider(config: &WalletConfig) -> Option<Arc<dyn WalletProvider>> {
    let endpoint = config.endpoint.as_deref()?;

    let provider = match RpcWalletProvider::connect(endpoint) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring wallet endpoint");
            return None;
        }
    };

    let probe = timeout(
        Duration::from_secs(config.detect_timeout_secs),
        provider.chain_id(),
    );
    match probe.await {
        Ok(Ok(chain_id)) => {
            tracing::info!(endpoint, chain_id = %chain_id, "Wallet provider detected");
        }
        Ok(Err(ProviderError::Transport(e))) => {
            tracing::info!(endpoint, error = %e, "No wallet provider reachable");
            return None;
        }
        Ok(Err(e)) => {
            tracing::debug!(endpoint, error = %e, "Wallet provider answered with an error");
        }
        Err(_) => {
            tracing::info!(endpoint, "Wallet provider detection timed out");
            return None;
        }
    }

    Some(Arc::new(provider))
}
