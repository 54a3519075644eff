//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, addresses and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MinterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::MinterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("network.name must not be empty")]
    EmptyNetworkName,

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("contract.address must not be the zero address")]
    ZeroContractAddress,

    #[error("contract.asset_tag must not be empty")]
    EmptyAssetTag,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.metrics_address is not a socket address: {0}")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &MinterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let network = &config.network;
    if network.name.trim().is_empty() {
        errors.push(ValidationError::EmptyNetworkName);
    }
    check_url("network.rpc_url", &network.rpc_url, &mut errors);
    check_url("network.explorer_url", &network.explorer_url, &mut errors);

    if config.contract.address.is_zero() {
        errors.push(ValidationError::ZeroContractAddress);
    }
    if config.contract.asset_tag.is_empty() {
        errors.push(ValidationError::EmptyAssetTag);
    }

    if let Some(endpoint) = &config.wallet.endpoint {
        check_url("wallet.endpoint", endpoint, &mut errors);
    }
    if config.wallet.detect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("wallet.detect_timeout_secs"));
    }

    if config.confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero("confirmation.poll_interval_ms"));
    }
    if config.confirmation.timeout_secs == Some(0) {
        errors.push(ValidationError::Zero("confirmation.timeout_secs"));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if url::Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
