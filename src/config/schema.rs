//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! billboard client. All types derive Serde traits for deserialization
//! from config files; every section has production-ready defaults.

use serde::{Deserialize, Serialize};

/// Root configuration for the billboard client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BillboardConfig {
    /// Network selector ("testnet", "mainnet", "local").
    pub network: String,

    /// Fullnode REST settings.
    pub chain: ChainConfig,

    /// GraphQL indexer settings.
    pub indexer: IndexerConfig,

    /// Fee-sponsorship ("gas station") settings.
    pub sponsor: SponsorConfig,

    /// Message posting rules.
    pub posting: PostingConfig,

    /// Submission rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Wallet display settings.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for BillboardConfig {
    fn default() -> Self {
        Self {
            network: "testnet".to_string(),
            chain: ChainConfig::default(),
            indexer: IndexerConfig::default(),
            sponsor: SponsorConfig::default(),
            posting: PostingConfig::default(),
            rate_limit: RateLimitConfig::default(),
            wallet: WalletConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Fullnode REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Primary fullnode base URL.
    pub fullnode_url: String,

    /// Failover fullnode base URLs.
    pub failover_urls: Vec<String>,

    /// Address of the account holding the billboard module.
    pub contract_address: String,

    /// Module name within the contract account.
    pub module_name: String,

    /// Framework account address (coin module lives here).
    pub framework_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Gas unit price for self-built transactions.
    pub gas_unit_price: u64,

    /// Transaction expiry window in seconds.
    pub expiration_secs: u64,

    /// Confirmation poll interval in milliseconds.
    pub confirm_poll_ms: u64,

    /// Maximum time to wait for confirmation in seconds.
    pub confirm_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            fullnode_url: "https://fullnode.testnet.example.net/v1".to_string(),
            failover_urls: Vec::new(),
            contract_address: "0x24051bca580d28e80a340a17f87c99def0cc0bde05f9f9d88e8eebdfad1cfb03"
                .to_string(),
            module_name: "billboard".to_string(),
            framework_address: "0x1".to_string(),
            request_timeout_secs: 10,
            gas_unit_price: 100,
            expiration_secs: 60,
            confirm_poll_ms: 2000,
            confirm_timeout_secs: 30,
        }
    }
}

/// GraphQL indexer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// GraphQL endpoint URL.
    pub url: String,

    /// Optional Hasura admin secret sent as a request header.
    pub admin_secret: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Poll interval for the feed watcher in milliseconds.
    pub poll_interval_ms: u64,

    /// Default page size for feed queries.
    pub default_limit: u32,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: "https://indexer.testnet.example.net/v1/graphql".to_string(),
            admin_secret: None,
            request_timeout_secs: 10,
            poll_interval_ms: 5000,
            default_limit: 50,
        }
    }
}

/// Fee-sponsorship service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SponsorConfig {
    /// Enable sponsored submission when the wallet is eligible.
    pub enabled: bool,

    /// Sponsorship API base URL.
    pub url: String,

    /// API key; empty means sponsorship is unavailable.
    pub api_key: String,

    /// Gas cap the sponsor enforces on sponsored transactions.
    pub max_gas_amount: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for SponsorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://sponsor.testnet.example.net/v1".to_string(),
            api_key: String::new(),
            max_gas_amount: 50,
            request_timeout_secs: 10,
        }
    }
}

/// Message posting rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PostingConfig {
    /// Maximum message length in characters.
    pub max_message_length: usize,

    /// Substrings rejected by the content policy (case-insensitive).
    pub prohibited_words: Vec<String>,

    /// Gas cap for self-paid transactions.
    pub max_gas_amount: u64,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            max_message_length: 100,
            prohibited_words: vec![
                "spam".to_string(),
                "scam".to_string(),
                "hack".to_string(),
                "phishing".to_string(),
            ],
            max_gas_amount: 200_000,
        }
    }
}

/// Submission rate-limit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum submissions per sender within one window.
    pub max_submissions: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: 5,
            window_secs: 60,
        }
    }
}

/// Wallet display configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Balance (in whole coins) shown as a 100% full gauge.
    pub full_gauge_coins: f64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            full_gauge_coins: 10.0,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_contract_limits() {
        let config = BillboardConfig::default();
        assert_eq!(config.posting.max_message_length, 100);
        assert_eq!(config.sponsor.max_gas_amount, 50);
        assert_eq!(config.posting.max_gas_amount, 200_000);
        assert_eq!(config.rate_limit.max_submissions, 5);
        assert_eq!(config.rate_limit.window_secs, 60);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: BillboardConfig = toml::from_str(
            r#"
            network = "local"

            [chain]
            fullnode_url = "http://127.0.0.1:8080/v1"
            "#,
        )
        .unwrap();
        assert_eq!(config.network, "local");
        assert_eq!(config.chain.fullnode_url, "http://127.0.0.1:8080/v1");
        assert_eq!(config.chain.module_name, "billboard");
        assert_eq!(config.indexer.poll_interval_ms, 5000);
    }
}
