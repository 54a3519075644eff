//! Connection state and its classification.

use alloy::primitives::Address;

use crate::blockchain::types::ChainId;

/// Whether there is a usable, correctly networked account.
///
/// Always derived from what the provider reports; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No provider, no authorized account, or a failed request.
    #[default]
    Disconnected,
    /// An account is authorized but the wallet is on another chain.
    ConnectedWrongNetwork { account: Address, chain_id: ChainId },
    /// An account is authorized on the target chain.
    ConnectedReady { account: Address },
}

impl ConnectionState {
    /// The account, if minting is allowed right now.
    pub fn ready_account(&self) -> Option<Address> {
        match self {
            Self::ConnectedReady { account } => Some(*account),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::ConnectedReady { .. })
    }

    /// Short label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::ConnectedWrongNetwork { .. } => "wrong_network",
            Self::ConnectedReady { .. } => "ready",
        }
    }
}

/// Derive the connection state from the provider's answers.
///
/// Only the first account is considered current.
pub fn classify(accounts: &[Address], chain_id: ChainId, target: ChainId) -> ConnectionState {
    match accounts.first() {
        None => ConnectionState::Disconnected,
        Some(&account) if chain_id == target => ConnectionState::ConnectedReady { account },
        Some(&account) => ConnectionState::ConnectedWrongNetwork { account, chain_id },
    }
}
