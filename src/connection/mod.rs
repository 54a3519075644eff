//! Wallet connection subsystem.
//!
//! # State Machine
//! ```text
//! Disconnected ──query: account on target──────────▶ ConnectedReady
//! Disconnected ──query: account on other chain─────▶ ConnectedWrongNetwork
//! Disconnected ──request + network correction──────▶ ConnectedReady
//! ConnectedWrongNetwork ──network corrected────────▶ ConnectedReady
//! any ──provider error / user rejection────────────▶ Disconnected
//! ```

pub mod manager;
pub mod state;

pub use manager::{switch_network, ConnectError, ConnectionManager, SwitchOutcome};
pub use state::{classify, ConnectionState};
