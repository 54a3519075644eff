//! Confirmation monitoring.
//!
//! # Responsibilities
//! - Poll the provider for a receipt until the transaction is included
//! - Distinguish reverted execution from success
//! - Apply an optional upper bound on the wait

use std::time::Duration;

use alloy::primitives::TxHash;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::provider::WalletProvider;
use crate::blockchain::types::{BlockchainError, BlockchainResult, Inclusion};
use crate::config::schema::ConfirmationConfig;

/// Shortest gap between receipt polls. `tokio::time::interval` rejects zero.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// How to wait for a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Interval between receipt polls.
    pub poll_interval: Duration,
    /// Give up after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl From<&ConfirmationConfig> for ConfirmationPolicy {
    fn from(config: &ConfirmationConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self::from(&ConfirmationConfig::default())
    }
}

/// Wait until `tx_hash` is included in a block.
///
/// Returns [`BlockchainError::Reverted`] if the receipt reports failed
/// execution. Provider errors while polling end the wait.
pub async fn wait_for_inclusion(
    provider: &dyn WalletProvider,
    tx_hash: TxHash,
    policy: &ConfirmationPolicy,
) -> BlockchainResult<Inclusion> {
    let poll = poll_until_included(provider, tx_hash, policy.poll_interval);

    match policy.timeout {
        Some(limit) => timeout(limit, poll)
            .await
            .map_err(|_| BlockchainError::ConfirmationTimeout { tx_hash, limit })?,
        None => poll.await,
    }
}

async fn poll_until_included(
    provider: &dyn WalletProvider,
    tx_hash: TxHash,
    poll_interval: Duration,
) -> BlockchainResult<Inclusion> {
    let mut ticker = interval(poll_interval.max(MIN_POLL_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match provider.transaction_receipt(tx_hash).await? {
            Some(inclusion) if inclusion.success => return Ok(inclusion),
            Some(inclusion) => {
                return Err(BlockchainError::Reverted {
                    tx_hash,
                    block_number: inclusion.block_number,
                })
            }
            None => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
        }
    }
}
