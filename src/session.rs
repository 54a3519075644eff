//! The surface presentation code talks to.
//!
//! A [`MintSession`] composes the connection manager and the mint
//! orchestrator and exposes two actions (`connect`, `mint`) plus observable
//! values. It never hands out a raw fault: outcomes are an enum or an
//! `Option`, and details go to the log.

use std::sync::Arc;

use alloy::primitives::Address;
use tokio::sync::watch;

use crate::blockchain::provider::WalletProvider;
use crate::blockchain::transaction::ConfirmationPolicy;
use crate::config::schema::MinterConfig;
use crate::connection::{ConnectError, ConnectionManager, ConnectionState};
use crate::minting::{MintOrchestrator, MintReceipt, MintStatus};

/// Message shown when no wallet is available.
pub const INSTALL_WALLET_NOTICE: &str = "Please install a wallet such as MetaMask!";

/// Result of the `connect` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// The account is authorized and on the target network.
    Connected(Address),
    /// No wallet exists; show [`INSTALL_WALLET_NOTICE`].
    InstallWallet,
    /// The user declined or the wallet failed; the action may be retried.
    NotConnected,
}

impl ConnectOutcome {
    /// Text to show the user, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::InstallWallet => Some(INSTALL_WALLET_NOTICE),
            _ => None,
        }
    }
}

/// One user's connect-then-mint session.
pub struct MintSession {
    connection: ConnectionManager,
    orchestrator: Option<MintOrchestrator>,
    mint_status: watch::Receiver<MintStatus>,
}

impl MintSession {
    /// Build a session.
    ///
    /// # Arguments
    /// * `config` - Target network, contract and confirmation settings
    /// * `provider` - Detected wallet, `None` when no wallet was found
    ///
    /// # Returns
    /// A disconnected session; call [`MintSession::on_load`] to pick up an
    /// existing authorization.
    pub fn new(config: &MinterConfig, provider: Option<Arc<dyn WalletProvider>>) -> Self {
        let orchestrator = provider.clone().map(|provider| {
            MintOrchestrator::new(
                provider,
                config.contract.clone(),
                &config.network,
                ConfirmationPolicy::from(&config.confirmation),
            )
        });

        let mint_status = match &orchestrator {
            Some(orchestrator) => orchestrator.subscribe(),
            // The sender is dropped; the receiver keeps reporting Idle.
            None => watch::channel(MintStatus::Idle).1,
        };

        Self {
            connection: ConnectionManager::new(provider, config.network.clone()),
            orchestrator,
            mint_status,
        }
    }

    /// Pick up an existing authorization without prompting. Call on load.
    pub async fn on_load(&mut self) -> Option<Address> {
        self.connection.query_existing_connection().await
    }

    /// The `connect` action.
    pub async fn connect(&mut self) -> ConnectOutcome {
        match self.connection.request_connection().await {
            Ok(account) => ConnectOutcome::Connected(account),
            Err(ConnectError::ProviderMissing) => ConnectOutcome::InstallWallet,
            Err(_) => ConnectOutcome::NotConnected,
        }
    }

    /// Put the wallet on the target network without asking for accounts.
    pub async fn switch_network(&mut self) -> bool {
        let target = self.connection.target().clone();
        self.connection.ensure_target_network(&target).await
    }

    /// The `mint` action.
    ///
    /// Does nothing unless the connection is ready. Failures leave the
    /// connection state untouched and yield `None`.
    pub async fn mint(&mut self) -> Option<MintReceipt> {
        let Some(account) = self.connection.current_account() else {
            tracing::warn!(
                state = self.connection.state().as_str(),
                "Mint requested without a ready connection"
            );
            return None;
        };
        let orchestrator = self.orchestrator.as_ref()?;
        orchestrator.mint(account).await
    }

    /// The account the presentation layer should show, if any.
    pub fn current_account(&self) -> Option<Address> {
        self.connection.current_account()
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Observe `current_account`.
    pub fn watch_account(&self) -> watch::Receiver<Option<Address>> {
        self.connection.subscribe()
    }

    /// Observe mint progress.
    pub fn watch_mint_status(&self) -> watch::Receiver<MintStatus> {
        self.mint_status.clone()
    }
}
