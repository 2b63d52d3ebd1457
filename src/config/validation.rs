//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the configured chain is a casino chain with deployed contracts
//! - Validate value ranges (timeouts > 0, multipliers, house edge)
//! - Validate addresses and URLs before they reach the blockchain layer
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use alloy::primitives::Address;
use thiserror::Error;

use crate::casino::chains::casino_chain_by_id;
use crate::casino::games::BP_VALUE;
use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Server
    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be > 0"));
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::new("server.max_body_bytes", "must be > 0"));
    }

    // Blockchain
    let chain = &config.blockchain;
    check_url(&mut errors, "blockchain.rpc_url", &chain.rpc_url);
    for (i, url) in chain.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("blockchain.failover_urls[{}]", i), url);
    }
    if casino_chain_by_id(chain.chain_id).is_none() {
        errors.push(ValidationError::new(
            "blockchain.chain_id",
            format!("chain id {} is not a casino chain", chain.chain_id),
        ));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if chain.gas_price_multiplier < 1.0 {
        errors.push(ValidationError::new("blockchain.gas_price_multiplier", "must be >= 1.0"));
    }
    if chain.gas_limit_multiplier < 1.0 {
        errors.push(ValidationError::new("blockchain.gas_limit_multiplier", "must be >= 1.0"));
    }
    if chain.max_gas_price_gwei == 0 {
        errors.push(ValidationError::new("blockchain.max_gas_price_gwei", "must be > 0"));
    }

    // Casino
    let casino = &config.casino;
    check_address(&mut errors, "casino.affiliate", &casino.affiliate);
    if u32::from(casino.max_house_edge_bps) > BP_VALUE {
        errors.push(ValidationError::new(
            "casino.max_house_edge_bps",
            format!("must be <= {}", BP_VALUE),
        ));
    }
    if casino.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new("casino.confirmation_timeout_secs", "must be > 0"));
    }
    if casino.roll_lookup_blocks == 0 {
        errors.push(ValidationError::new("casino.roll_lookup_blocks", "must be > 0"));
    }

    let mut seen = HashSet::new();
    for (i, deployment) in casino.chains.iter().enumerate() {
        let prefix = format!("casino.chains[{}]", i);
        if casino_chain_by_id(deployment.chain_id).is_none() {
            errors.push(ValidationError::new(
                format!("{}.chain_id", prefix),
                format!("chain id {} is not a casino chain", deployment.chain_id),
            ));
        }
        if !seen.insert(deployment.chain_id) {
            errors.push(ValidationError::new(
                format!("{}.chain_id", prefix),
                format!("chain id {} is configured twice", deployment.chain_id),
            ));
        }
        check_address(&mut errors, &format!("{}.bank", prefix), &deployment.bank);
        for (game, address) in [
            ("coin_toss", &deployment.coin_toss),
            ("dice", &deployment.dice),
            ("roulette", &deployment.roulette),
        ] {
            if let Some(address) = address {
                check_address(&mut errors, &format!("{}.{}", prefix, game), address);
            }
        }
    }
    if !casino.chains.iter().any(|c| c.chain_id == chain.chain_id) {
        errors.push(ValidationError::new(
            "casino.chains",
            format!("no casino contracts configured for chain id {}", chain.chain_id),
        ));
    }

    if let Some(url) = &casino.vrf.fee_api_url {
        check_url(&mut errors, "casino.vrf.fee_api_url", url);
    }
    if casino.vrf.timeout_secs == 0 {
        errors.push(ValidationError::new("casino.vrf.timeout_secs", "must be > 0"));
    }

    // Observability
    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            field,
            format!("'{}' is not an EVM address", value),
        ));
    }
}
