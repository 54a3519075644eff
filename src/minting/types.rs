//! Mint lifecycle types.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

use crate::blockchain::provider::ProviderError;
use crate::blockchain::types::BlockchainError;

/// A confirmed mint, held only long enough to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    /// Account the token was minted to.
    pub recipient: Address,
    /// Hash of the mint transaction.
    pub tx_hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: u64,
    /// Block explorer page for the transaction.
    pub explorer_link: String,
}

/// Observable progress of the current mint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MintStatus {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Waiting for the user to sign in the wallet.
    AwaitingSignature,
    /// Broadcast, waiting for inclusion in a block.
    Mining { tx_hash: TxHash },
    /// Included in a block.
    Mined(MintReceipt),
    /// Rejected, reverted or otherwise failed. No receipt exists.
    Failed(String),
}

impl MintStatus {
    /// Whether the mint has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Mined(_) | Self::Failed(_))
    }
}

/// Why a mint produced no receipt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MintError {
    /// The user declined to sign.
    #[error("Transaction rejected by user")]
    UserRejected,

    /// Reverted on chain or never confirmed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// The wallet or network failed before the transaction was accepted.
    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for MintError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UserRejected => Self::UserRejected,
            other => Self::Provider(other),
        }
    }
}

impl From<BlockchainError> for MintError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::Provider(e) => e.into(),
            other @ (BlockchainError::Reverted { .. }
            | BlockchainError::ConfirmationTimeout { .. }) => {
                Self::TransactionFailed(other.to_string())
            }
        }
    }
}

/// Explorer URL for a transaction, e.g. `https://rinkeby.etherscan.io/tx/0x…`.
pub fn explorer_tx_link(explorer_url: &str, tx_hash: TxHash) -> String {
    format!("{}/tx/{}", explorer_url.trim_end_matches('/'), tx_hash)
}
