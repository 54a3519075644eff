//! Wallet connection and network correction.
//!
//! # Responsibilities
//! - Check for an existing authorization without prompting
//! - Prompt for authorization on explicit user action
//! - Move the wallet onto the target network, adding it if unknown
//! - Own the current [`ConnectionState`] and publish the ready account

use std::sync::Arc;

use alloy::primitives::Address;
use thiserror::Error;
use tokio::sync::watch;

use crate::blockchain::provider::{ProviderError, ProviderResult, WalletProvider};
use crate::blockchain::types::{ChainId, NetworkDescriptor};
use crate::connection::state::{classify, ConnectionState};
use crate::observability::metrics;

/// Why a connection request did not produce a ready account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// No wallet is available in this environment.
    #[error("No wallet provider found. Please install a wallet such as MetaMask")]
    ProviderMissing,

    /// The user declined the authorization prompt.
    #[error("Connection request rejected by user")]
    UserRejected,

    /// The wallet approved the request but returned no account.
    #[error("Wallet returned no accounts")]
    NoAccounts,

    /// The wallet stayed on the wrong chain.
    #[error("Wallet is on chain {actual}, expected {expected}")]
    NetworkMismatch { expected: ChainId, actual: ChainId },

    /// Any other provider failure.
    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for ConnectError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UserRejected => Self::UserRejected,
            other => Self::Provider(other),
        }
    }
}

/// How [`switch_network`] reached the target chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The wallet was already on the target chain; nothing was requested.
    AlreadyActive,
    /// A plain switch succeeded.
    Switched,
    /// The chain had to be added before the switch succeeded.
    AddedThenSwitched,
}

/// Put the wallet on `target`.
///
/// Reads the active chain first and returns without any request if it
/// already matches. An unknown-chain answer to the switch is followed by
/// exactly one add and exactly one retried switch.
pub async fn switch_network(
    provider: &dyn WalletProvider,
    target: &NetworkDescriptor,
) -> ProviderResult<SwitchOutcome> {
    if provider.chain_id().await? == target.chain_id {
        return Ok(SwitchOutcome::AlreadyActive);
    }

    match provider.switch_chain(target.chain_id).await {
        Ok(()) => Ok(SwitchOutcome::Switched),
        Err(ProviderError::ChainUnknownToProvider) => {
            tracing::info!(
                chain_id = %target.chain_id,
                name = %target.name,
                "Wallet does not know the target network, adding it"
            );
            provider.add_chain(target).await?;
            provider.switch_chain(target.chain_id).await?;
            Ok(SwitchOutcome::AddedThenSwitched)
        }
        Err(e) => Err(e),
    }
}

/// Single source of truth for "is there a usable, correctly networked account".
///
/// This is the only writer of [`ConnectionState`]. The ready account is
/// mirrored into a watch channel for presentation code.
pub struct ConnectionManager {
    provider: Option<Arc<dyn WalletProvider>>,
    target: NetworkDescriptor,
    state: ConnectionState,
    account_tx: watch::Sender<Option<Address>>,
}

impl ConnectionManager {
    /// Create a manager in the `Disconnected` state.
    ///
    /// # Arguments
    /// * `provider` - Wallet capability, `None` when no wallet is installed
    /// * `target` - Network the wallet must be on before an account is ready
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, target: NetworkDescriptor) -> Self {
        let (account_tx, _) = watch::channel(None);
        Self {
            provider,
            target,
            state: ConnectionState::Disconnected,
            account_tx,
        }
    }

    /// Whether a wallet provider is available at all.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// The current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The account that may mint right now.
    pub fn current_account(&self) -> Option<Address> {
        self.state.ready_account()
    }

    /// The network this manager reconciles the wallet against.
    pub fn target(&self) -> &NetworkDescriptor {
        &self.target
    }

    /// Observe the ready account as it changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Address>> {
        self.account_tx.subscribe()
    }

    fn set_state(&mut self, state: ConnectionState) {
        if state != self.state {
            tracing::debug!(from = self.state.as_str(), to = state.as_str(), "Connection state changed");
        }
        self.state = state;
        self.account_tx.send_if_modified(|current| {
            let next = state.ready_account();
            let changed = *current != next;
            *current = next;
            changed
        });
    }

    /// Return the already-authorized account if it is on the target network.
    ///
    /// Never prompts the user. Without a provider no request is made.
    pub async fn query_existing_connection(&mut self) -> Option<Address> {
        let Some(provider) = self.provider.clone() else {
            tracing::debug!("No wallet provider, skipping connection check");
            self.set_state(ConnectionState::Disconnected);
            metrics::record_connection("query", "no_provider");
            return None;
        };

        let state = match self.read_state(provider.as_ref()).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to query wallet connection");
                self.set_state(ConnectionState::Disconnected);
                metrics::record_connection("query", "error");
                return None;
            }
        };

        match state {
            ConnectionState::Disconnected => {
                tracing::info!("No authorized account found");
            }
            ConnectionState::ConnectedWrongNetwork { account, chain_id } => {
                tracing::info!(
                    address = %account,
                    chain_id = %chain_id,
                    expected = %self.target.chain_id,
                    "Found an account on the wrong network"
                );
            }
            ConnectionState::ConnectedReady { account } => {
                tracing::info!(address = %account, "Found an account");
            }
        }

        self.set_state(state);
        metrics::record_connection("query", state.as_str());
        self.current_account()
    }

    async fn read_state(&self, provider: &dyn WalletProvider) -> ProviderResult<ConnectionState> {
        let accounts = provider.accounts().await?;
        if accounts.is_empty() {
            return Ok(ConnectionState::Disconnected);
        }
        let chain_id = provider.chain_id().await?;
        Ok(classify(&accounts, chain_id, self.target.chain_id))
    }

    /// Ask the user to connect, then make sure the wallet is on the target
    /// network.
    ///
    /// Any failure leaves the state `Disconnected`.
    pub async fn request_connection(&mut self) -> Result<Address, ConnectError> {
        let result = match self.provider.clone() {
            Some(provider) => self.connect_with(provider).await,
            None => Err(ConnectError::ProviderMissing),
        };

        match &result {
            Ok(account) => {
                tracing::info!(address = %account, "Wallet connected");
                self.set_state(ConnectionState::ConnectedReady { account: *account });
                metrics::record_connection("request", "ready");
            }
            Err(ConnectError::UserRejected) => {
                tracing::info!("User declined the connection request");
                self.set_state(ConnectionState::Disconnected);
                metrics::record_connection("request", "rejected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Wallet connection failed");
                self.set_state(ConnectionState::Disconnected);
                metrics::record_connection("request", "error");
            }
        }

        result
    }

    async fn connect_with(&mut self, provider: Arc<dyn WalletProvider>) -> Result<Address, ConnectError> {
        let accounts = provider.request_accounts().await?;
        let account = *accounts.first().ok_or(ConnectError::NoAccounts)?;
        tracing::debug!(address = %account, "Account authorized");

        let chain_id = provider.chain_id().await?;
        let state = classify(&accounts, chain_id, self.target.chain_id);
        if state.is_ready() {
            return Ok(account);
        }

        self.set_state(state);
        let target = self.target.clone();
        if self.ensure_target_network(&target).await {
            Ok(account)
        } else {
            Err(ConnectError::NetworkMismatch {
                expected: target.chain_id,
                actual: chain_id,
            })
        }
    }

    /// Move the wallet onto `target`, adding the chain if the wallet does not
    /// know it.
    ///
    /// Returns `false` when the network could not be corrected; the caller
    /// must not treat the account as ready. Never fails past this point.
    /// Moving the wallet to a chain other than the configured target leaves
    /// the state `Disconnected`.
    pub async fn ensure_target_network(&mut self, target: &NetworkDescriptor) -> bool {
        let Some(provider) = self.provider.clone() else {
            return false;
        };

        match switch_network(provider.as_ref(), target).await {
            Ok(outcome) => {
                tracing::info!(chain_id = %target.chain_id, ?outcome, "Wallet on target network");
                metrics::record_network_switch(match outcome {
                    SwitchOutcome::AlreadyActive => "already_active",
                    SwitchOutcome::Switched => "switched",
                    SwitchOutcome::AddedThenSwitched => "added",
                });
                if target.chain_id != self.target.chain_id {
                    // The wallet now sits on a chain this manager does not mint on.
                    self.set_state(ConnectionState::Disconnected);
                } else if let ConnectionState::ConnectedWrongNetwork { account, .. } = self.state {
                    self.set_state(ConnectionState::ConnectedReady { account });
                }
                true
            }
            Err(e) => {
                if e.is_user_rejection() {
                    tracing::info!(chain_id = %target.chain_id, "User declined the network change");
                } else {
                    tracing::warn!(chain_id = %target.chain_id, error = %e, "Failed to switch network");
                }
                metrics::record_network_switch("failed");
                self.set_state(ConnectionState::Disconnected);
                false
            }
        }
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("has_provider", &self.has_provider())
            .field("target", &self.target.chain_id)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejection_maps_to_its_own_variant() {
        assert_eq!(
            ConnectError::from(ProviderError::UserRejected),
            ConnectError::UserRejected
        );
        assert_eq!(
            ConnectError::from(ProviderError::Transport("refused".into())),
            ConnectError::Provider(ProviderError::Transport("refused".into()))
        );
    }

    #[test]
    fn test_missing_provider_message_asks_for_install() {
        assert!(ConnectError::ProviderMissing.to_string().contains("install a wallet"));
    }

    #[tokio::test]
    async fn test_without_provider_nothing_is_ready() {
        let mut manager = ConnectionManager::new(None, NetworkDescriptor::default());
        assert!(!manager.has_provider());
        assert_eq!(manager.query_existing_connection().await, None);
        assert_eq!(
            manager.request_connection().await,
            Err(ConnectError::ProviderMissing)
        );
        assert!(!manager.ensure_target_network(&NetworkDescriptor::default()).await);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert_eq!(*manager.subscribe().borrow(), None);
    }
}
