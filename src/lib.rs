//! Wallet-connected NFT minting client.
//!
//! ```text
//!   on load / "connect"                         "mint"
//!          │                                      │
//!          ▼                                      ▼
//!  ┌────────────────────┐  ready account  ┌──────────────────┐
//!  │ ConnectionManager  │────────────────▶│ MintOrchestrator │
//!  │ accounts + network │                 │ submit + confirm │
//!  └─────────┬──────────┘                 └────────┬─────────┘
//!            │         WalletProvider (EIP-1193)   │
//!            └──────────────────┬──────────────────┘
//!                               ▼
//!                         wallet / network
//! ```

pub mod blockchain;
pub mod config;
pub mod connection;
pub mod minting;
pub mod observability;
pub mod session;

pub use config::schema::MinterConfig;
pub use session::{ConnectOutcome, MintSession};
