//! Binding for the NFT contract.
//!
//! Only `mint(address,string)` is used. The call is encoded locally and
//! handed to the wallet, which signs it with the connected account.

use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::provider::{ProviderResult, WalletProvider};
use crate::blockchain::transaction::{wait_for_inclusion, ConfirmationPolicy};
use crate::blockchain::types::{BlockchainResult, Inclusion};

sol! {
    /// Minting surface of the Merkle NFT contract.
    interface IMerkleNft {
        function mint(address to, string uri) external returns (uint256);
    }
}

/// The NFT contract, bound to a provider and a signing account.
#[derive(Clone)]
pub struct NftContract {
    address: Address,
    signer: Address,
    provider: Arc<dyn WalletProvider>,
}

impl NftContract {
    /// Bind to the contract at `address`; transactions are sent from `signer`.
    pub fn new(address: Address, signer: Address, provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            address,
            signer,
            provider,
        }
    }

    /// The contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Build the `mint` transaction without sending it.
    pub fn mint_request(&self, recipient: Address, asset_tag: &str) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.signer)
            .with_to(self.address)
            .with_input(encode_mint(recipient, asset_tag))
    }

    /// Submit `mint(recipient, asset_tag)`. Resolves once the wallet has
    /// signed and broadcast the transaction, not when it is mined.
    pub async fn mint(&self, recipient: Address, asset_tag: &str) -> ProviderResult<PendingMint> {
        let tx = self.mint_request(recipient, asset_tag);
        let tx_hash = self.provider.send_transaction(tx).await?;

        Ok(PendingMint {
            tx_hash,
            provider: self.provider.clone(),
        })
    }
}

impl std::fmt::Debug for NftContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NftContract")
            .field("address", &self.address)
            .field("signer", &self.signer)
            .finish()
    }
}

/// ABI-encoded calldata for `mint(recipient, asset_tag)`.
pub fn encode_mint(recipient: Address, asset_tag: &str) -> Bytes {
    IMerkleNft::mintCall {
        to: recipient,
        uri: asset_tag.to_string(),
    }
    .abi_encode()
    .into()
}

/// A broadcast mint that has not been confirmed yet.
pub struct PendingMint {
    tx_hash: TxHash,
    provider: Arc<dyn WalletProvider>,
}

impl PendingMint {
    /// Hash of the submitted transaction.
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait for the transaction to be included in a block.
    pub async fn confirmed(&self, policy: &ConfirmationPolicy) -> BlockchainResult<Inclusion> {
        wait_for_inclusion(self.provider.as_ref(), self.tx_hash, policy).await
    }
}
