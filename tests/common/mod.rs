//! Shared utilities for integration tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use nft_minter::blockchain::{
    ChainId, Inclusion, NetworkDescriptor, ProviderError, ProviderResult, WalletProvider,
};
use nft_minter::config::MinterConfig;

/// Every request the fake has seen, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Accounts,
    RequestAccounts,
    ChainId,
    SwitchChain(ChainId),
    AddChain(ChainId),
    SendTransaction,
    TransactionReceipt(TxHash),
}

#[derive(Debug)]
struct Script {
    authorized: Vec<Address>,
    approval: Result<Vec<Address>, ProviderError>,
    chain: ChainId,
    known_chains: HashSet<ChainId>,
    accounts_error: Option<ProviderError>,
    chain_id_error: Option<ProviderError>,
    switch_error: Option<ProviderError>,
    retry_switch_error: Option<ProviderError>,
    add_error: Option<ProviderError>,
    send_error: Option<ProviderError>,
    tx_hash: TxHash,
    pending_polls: u32,
    reverts: bool,
    sent: Vec<TransactionRequest>,
    calls: Vec<Call>,
}

/// A scripted in-memory wallet that records every call.
#[derive(Debug)]
pub struct FakeProvider {
    script: Mutex<Script>,
}

#[allow(dead_code)]
impl FakeProvider {
    /// A wallet on `chain` with no authorized accounts that approves nothing.
    pub fn on_chain(chain: ChainId) -> Self {
        Self {
            script: Mutex::new(Script {
                authorized: Vec::new(),
                approval: Ok(Vec::new()),
                chain,
                known_chains: HashSet::from([chain]),
                accounts_error: None,
                chain_id_error: None,
                switch_error: None,
                retry_switch_error: None,
                add_error: None,
                send_error: None,
                tx_hash: TxHash::repeat_byte(0x42),
                pending_polls: 0,
                reverts: false,
                sent: Vec::new(),
                calls: Vec::new(),
            }),
        }
    }

    /// Accounts that `eth_accounts` reports without a prompt.
    pub fn with_authorized(self, accounts: Vec<Address>) -> Self {
        self.script.lock().unwrap().authorized = accounts;
        self
    }

    /// Accounts the user approves when prompted.
    pub fn approving(self, accounts: Vec<Address>) -> Self {
        self.script.lock().unwrap().approval = Ok(accounts);
        self
    }

    /// Make the connection prompt fail.
    pub fn rejecting_connection(self, err: ProviderError) -> Self {
        self.script.lock().unwrap().approval = Err(err);
        self
    }

    /// Chains the wallet can switch to without adding them.
    pub fn knowing(self, chain: ChainId) -> Self {
        self.script.lock().unwrap().known_chains.insert(chain);
        self
    }

    pub fn failing_accounts(self, err: ProviderError) -> Self {
        self.fail_accounts(err);
        self
    }

    /// Make `eth_accounts` fail from now on, on an already shared fake.
    pub fn fail_accounts(&self, err: ProviderError) {
        self.script.lock().unwrap().accounts_error = Some(err);
    }

    pub fn failing_chain_id(self, err: ProviderError) -> Self {
        self.script.lock().unwrap().chain_id_error = Some(err);
        self
    }

    /// Fail only the switch that follows a chain add.
    pub fn failing_retry_switch(self, err: ProviderError) -> Self {
        self.script.lock().unwrap().retry_switch_error = Some(err);
        self
    }

    pub fn failing_switch(self, err: ProviderError) -> Self {
        self.script.lock().unwrap().switch_error = Some(err);
        self
    }

    pub fn failing_add(self, err: ProviderError) -> Self {
        self.script.lock().unwrap().add_error = Some(err);
        self
    }

    pub fn failing_send(self, err: ProviderError) -> Self {
        self.script.lock().unwrap().send_error = Some(err);
        self
    }

    /// Receipt polls that report "pending" before inclusion.
    pub fn pending_for(self, polls: u32) -> Self {
        self.script.lock().unwrap().pending_polls = polls;
        self
    }

    pub fn reverting(self) -> Self {
        self.script.lock().unwrap().reverts = true;
        self
    }

    pub fn tx_hash(&self) -> TxHash {
        self.script.lock().unwrap().tx_hash
    }

    pub fn chain(&self) -> ChainId {
        self.script.lock().unwrap().chain
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls().iter().filter(|call| *call == wanted).count()
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.script.lock().unwrap().sent.clone()
    }

    fn record(&self, call: Call) -> std::sync::MutexGuard<'_, Script> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(call);
        script
    }
}

#[async_trait]
impl WalletProvider for FakeProvider {
    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        let script = self.record(Call::Accounts);
        if let Some(err) = script.accounts_error.clone() {
            return Err(err);
        }
        Ok(script.authorized.clone())
    }

    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        let mut script = self.record(Call::RequestAccounts);
        let approved = script.approval.clone()?;
        script.authorized = approved.clone();
        Ok(approved)
    }

    async fn chain_id(&self) -> ProviderResult<ChainId> {
        let script = self.record(Call::ChainId);
        if let Some(err) = script.chain_id_error.clone() {
            return Err(err);
        }
        Ok(script.chain)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> ProviderResult<()> {
        let mut script = self.record(Call::SwitchChain(chain_id));
        if let Some(err) = script.switch_error.clone() {
            return Err(err);
        }
        let after_add = script
            .calls
            .iter()
            .any(|call| matches!(call, Call::AddChain(_)));
        if let (true, Some(err)) = (after_add, script.retry_switch_error.clone()) {
            return Err(err);
        }
        if !script.known_chains.contains(&chain_id) {
            return Err(ProviderError::ChainUnknownToProvider);
        }
        script.chain = chain_id;
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> ProviderResult<()> {
        let mut script = self.record(Call::AddChain(network.chain_id));
        if let Some(err) = script.add_error.clone() {
            return Err(err);
        }
        script.known_chains.insert(network.chain_id);
        Ok(())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> ProviderResult<TxHash> {
        let mut script = self.record(Call::SendTransaction);
        if let Some(err) = script.send_error.clone() {
            return Err(err);
        }
        script.sent.push(tx);
        Ok(script.tx_hash)
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> ProviderResult<Option<Inclusion>> {
        let mut script = self.record(Call::TransactionReceipt(tx_hash));
        if script.pending_polls > 0 {
            script.pending_polls -= 1;
            return Ok(None);
        }
        Ok(Some(Inclusion {
            block_number: 1_234,
            success: !script.reverts,
        }))
    }
}

/// Target chain used by every test config (Rinkeby).
pub const TARGET: ChainId = ChainId(4);

/// Any chain other than the target.
pub const OTHER: ChainId = ChainId(1);

/// Default config with a fast confirmation poll.
pub fn test_config() -> MinterConfig {
    let mut config = MinterConfig::default();
    config.confirmation.poll_interval_ms = 1;
    config
}

pub fn alice() -> Address {
    Address::with_last_byte(0xa1)
}

#[allow(dead_code)]
pub fn bob() -> Address {
    Address::with_last_byte(0xb0)
}

/// Share a fake as the trait object both components expect.
pub fn shared(fake: FakeProvider) -> (Arc<FakeProvider>, Option<Arc<dyn WalletProvider>>) {
    let fake = Arc::new(fake);
    let provider: Arc<dyn WalletProvider> = fake.clone();
    (fake, Some(provider))
}
