//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate endpoint URLs and the contract address
//! - Validate value ranges (timeouts, limits, windows nonzero)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: BillboardConfig -> Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::fmt;

use crate::chain::Address;
use crate::config::schema::BillboardConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `chain.fullnode_url`.
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a configuration, collecting every failure.
pub fn validate_config(config: &BillboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.network.as_str() {
        "testnet" | "mainnet" | "local" => {}
        other => errors.push(err("network", format!("unknown network '{}'", other))),
    }

    if config.chain.fullnode_url.parse::<url::Url>().is_err() {
        errors.push(err("chain.fullnode_url", "not a valid URL"));
    }
    for (i, u) in config.chain.failover_urls.iter().enumerate() {
        if u.parse::<url::Url>().is_err() {
            errors.push(err(
                &format!("chain.failover_urls[{}]", i),
                "not a valid URL",
            ));
        }
    }
    if Address::parse(&config.chain.contract_address).is_err() {
        errors.push(err("chain.contract_address", "not a valid address"));
    }
    if config.chain.module_name.is_empty() {
        errors.push(err("chain.module_name", "must not be empty"));
    }
    if config.chain.request_timeout_secs == 0 {
        errors.push(err("chain.request_timeout_secs", "must be nonzero"));
    }
    if config.chain.confirm_timeout_secs == 0 {
        errors.push(err("chain.confirm_timeout_secs", "must be nonzero"));
    }
    if config.chain.confirm_poll_ms == 0 {
        errors.push(err("chain.confirm_poll_ms", "must be nonzero"));
    }

    if config.indexer.url.parse::<url::Url>().is_err() {
        errors.push(err("indexer.url", "not a valid URL"));
    }
    if config.indexer.request_timeout_secs == 0 {
        errors.push(err("indexer.request_timeout_secs", "must be nonzero"));
    }
    if config.indexer.poll_interval_ms == 0 {
        errors.push(err("indexer.poll_interval_ms", "must be nonzero"));
    }
    if config.indexer.default_limit == 0 {
        errors.push(err("indexer.default_limit", "must be nonzero"));
    }

    if config.sponsor.enabled && config.sponsor.url.parse::<url::Url>().is_err() {
        errors.push(err("sponsor.url", "not a valid URL"));
    }
    if config.sponsor.request_timeout_secs == 0 {
        errors.push(err("sponsor.request_timeout_secs", "must be nonzero"));
    }
    if config.sponsor.max_gas_amount == 0 {
        errors.push(err("sponsor.max_gas_amount", "must be nonzero"));
    }

    if config.posting.max_message_length == 0 {
        errors.push(err("posting.max_message_length", "must be nonzero"));
    }
    if config.posting.max_gas_amount == 0 {
        errors.push(err("posting.max_gas_amount", "must be nonzero"));
    }

    if config.rate_limit.max_submissions == 0 {
        errors.push(err("rate_limit.max_submissions", "must be nonzero"));
    }
    if config.rate_limit.window_secs == 0 {
        errors.push(err("rate_limit.window_secs", "must be nonzero"));
    }

    if config.wallet.full_gauge_coins <= 0.0 {
        errors.push(err("wallet.full_gauge_coins", "must be positive"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
