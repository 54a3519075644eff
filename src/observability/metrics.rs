//! Metrics collection and exposition.
//!
//! # Metrics
//! - `minter_connection_attempts_total` (counter): by kind (query/request), outcome
//! - `minter_network_switches_total` (counter): by outcome
//! - `minter_mints_total` (counter): by outcome
//! - `minter_confirmation_seconds` (histogram): submission to inclusion
//!
//! Recording is a no-op until a recorder is installed, so library users that
//! never call [`init_metrics`] pay nothing.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record the outcome of a connection check or request.
pub fn record_connection(kind: &'static str, outcome: &'static str) {
    counter!("minter_connection_attempts_total", "kind" => kind, "outcome" => outcome)
        .increment(1);
}

/// Record the outcome of a network correction.
pub fn record_network_switch(outcome: &'static str) {
    counter!("minter_network_switches_total", "outcome" => outcome).increment(1);
}

/// Record the outcome of a mint.
pub fn record_mint(outcome: &'static str) {
    counter!("minter_mints_total", "outcome" => outcome).increment(1);
}

/// Record how long a mint took from submission to inclusion.
pub fn record_confirmation_latency(elapsed: Duration) {
    histogram!("minter_confirmation_seconds").record(elapsed.as_secs_f64());
}
