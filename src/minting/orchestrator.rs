//! Mint submission and confirmation.
//!
//! # Responsibilities
//! - Bind the NFT contract to the connected account
//! - Submit exactly one `mint` per call
//! - Publish `Mining` as soon as the transaction is broadcast
//! - Wait for inclusion and produce a receipt with an explorer link
//! - Absorb every failure at this boundary (log, publish, return `None`)

use std::sync::Arc;
use std::time::Instant;

use alloy::primitives::Address;
use tokio::sync::watch;

use crate::blockchain::contract::NftContract;
use crate::blockchain::provider::WalletProvider;
use crate::blockchain::transaction::ConfirmationPolicy;
use crate::blockchain::types::NetworkDescriptor;
use crate::config::schema::ContractConfig;
use crate::minting::types::{explorer_tx_link, MintError, MintReceipt, MintStatus};
use crate::observability::metrics;

/// Drives a mint from submission to confirmation.
pub struct MintOrchestrator {
    provider: Arc<dyn WalletProvider>,
    contract: ContractConfig,
    explorer_url: String,
    policy: ConfirmationPolicy,
    status: watch::Sender<MintStatus>,
}

impl MintOrchestrator {
    /// Create an orchestrator for one contract.
    ///
    /// # Arguments
    /// * `provider` - Wallet that signs and broadcasts the mint
    /// * `contract` - Contract address and the asset tag passed to `mint`
    /// * `network` - Target network, used for explorer links
    /// * `policy` - How long and how often to poll for inclusion
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        contract: ContractConfig,
        network: &NetworkDescriptor,
        policy: ConfirmationPolicy,
    ) -> Self {
        let (status, _) = watch::channel(MintStatus::Idle);
        Self {
            provider,
            contract,
            explorer_url: network.explorer_url.clone(),
            policy,
            status,
        }
    }

    /// Observe mint progress.
    pub fn subscribe(&self) -> watch::Receiver<MintStatus> {
        self.status.subscribe()
    }

    /// Mint to `account`, signed by `account`.
    ///
    /// Only call this with a ready account. Returns `None` on any failure;
    /// the reason is logged and published as [`MintStatus::Failed`].
    pub async fn mint(&self, account: Address) -> Option<MintReceipt> {
        self.status.send_replace(MintStatus::AwaitingSignature);

        match self.try_mint(account).await {
            Ok(receipt) => {
                tracing::info!(
                    tx_hash = %receipt.tx_hash,
                    block = receipt.block_number,
                    "Mined, see transaction: {}",
                    receipt.explorer_link
                );
                metrics::record_mint("mined");
                self.status.send_replace(MintStatus::Mined(receipt.clone()));
                Some(receipt)
            }
            Err(e) => {
                match &e {
                    MintError::UserRejected => {
                        tracing::info!("User declined to sign the mint");
                        metrics::record_mint("rejected");
                    }
                    MintError::TransactionFailed(_) => {
                        tracing::error!(error = %e, "Mint transaction failed");
                        metrics::record_mint("failed");
                    }
                    MintError::Provider(_) => {
                        tracing::error!(error = %e, "Mint could not be submitted");
                        metrics::record_mint("error");
                    }
                }
                self.status.send_replace(MintStatus::Failed(e.to_string()));
                None
            }
        }
    }

    async fn try_mint(&self, account: Address) -> Result<MintReceipt, MintError> {
        let contract = NftContract::new(self.contract.address, account, self.provider.clone());
        let pending = contract.mint(account, &self.contract.asset_tag).await?;
        let tx_hash = pending.tx_hash();
        let submitted = Instant::now();

        tracing::info!(tx_hash = %tx_hash, contract = %contract.address(), "Mining... please wait");
        self.status.send_replace(MintStatus::Mining { tx_hash });

        let inclusion = pending.confirmed(&self.policy).await?;
        metrics::record_confirmation_latency(submitted.elapsed());

        Ok(MintReceipt {
            recipient: account,
            tx_hash,
            block_number: inclusion.block_number,
            explorer_link: explorer_tx_link(&self.explorer_url, tx_hash),
        })
    }
}

impl std::fmt::Debug for MintOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MintOrchestrator")
            .field("contract", &self.contract.address)
            .field("explorer_url", &self.explorer_url)
            .field("policy", &self.policy)
            .finish()
    }
}
