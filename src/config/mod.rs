//! Configuration: schema, file/env loading, and semantic validation.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    load_config, load_default, ConfigError, INDEXER_URL_ENV_VAR, NETWORK_ENV_VAR,
    SPONSOR_API_KEY_ENV_VAR,
};
pub use schema::{
    BillboardConfig, ChainConfig, IndexerConfig, ObservabilityConfig, PostingConfig,
    RateLimitConfig, SponsorConfig, WalletConfig,
};
pub use validation::{validate_config, ValidationError};
