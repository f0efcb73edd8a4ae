//! GraphQL indexer integration: queries and the polling feed watcher.

pub mod client;
pub mod watch;

pub use client::{IndexedMessage, IndexerClient};
pub use watch::FeedWatcher;

use thiserror::Error;

/// Errors from the indexer service.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// HTTP transport failure.
    #[error("indexer request failed: {0}")]
    Http(String),

    /// Non-success HTTP status from the endpoint.
    #[error("indexer API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// GraphQL-level errors reported in the response envelope.
    #[error("indexer query error: {0}")]
    GraphQl(String),

    /// Response body did not match the expected shape.
    #[error("unexpected indexer response: {0}")]
    Decode(String),
}
