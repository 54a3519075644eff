//! Minting subsystem.
//!
//! # Data Flow
//! ```text
//! ready account (from connection)
//!     → orchestrator.rs (bind contract, submit, publish status)
//!     → blockchain::transaction (wait for inclusion)
//!     → MintReceipt (hash + explorer link)
//! ```

pub mod orchestrator;
pub mod types;

pub use orchestrator::MintOrchestrator;
pub use types::{explorer_tx_link, MintError, MintReceipt, MintStatus};
