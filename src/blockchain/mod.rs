//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Wallet endpoint (EIP-1193 over JSON-RPC)
//!     → client.rs (provider detection, RPC calls, error mapping)
//!     → contract.rs (mint calldata, submission through the wallet)
//!     → transaction.rs (receipt polling until inclusion)
//! ```
//!
//! # Security Constraints
//! - Keys never leave the wallet; this crate only asks it to sign
//! - Every state-changing request goes through a wallet prompt

pub mod client;
pub mod contract;
pub mod provider;
pub mod transaction;
pub mod types;

pub use client::{detect_provider, RpcWalletProvider};
pub use contract::{NftContract, PendingMint};
pub use provider::{ProviderError, ProviderResult, WalletProvider};
pub use transaction::ConfirmationPolicy;
pub use types::{BlockchainError, ChainId, Inclusion, NetworkDescriptor};
