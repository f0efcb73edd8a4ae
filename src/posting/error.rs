//! Posting error taxonomy and user-facing message mapping.

use thiserror::Error;

use crate::chain::ChainError;
use crate::posting::validate::ContentViolation;
use crate::sponsor::SponsorError;
use crate::wallet::WalletError;

/// Failure classes recognized in raw error text from external services.
///
/// The node and the sponsor report many failures only as message strings,
/// so classification at that boundary is substring-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailure {
    InsufficientFunds,
    RateLimited,
    Cancelled,
    Network,
    Other,
}

/// Classify raw error text from an external call.
pub fn classify_remote(text: &str) -> RemoteFailure {
    let lowered = text.to_lowercase();
    if lowered.contains("insufficient") {
        RemoteFailure::InsufficientFunds
    } else if lowered.contains("rate limit") || lowered.contains("too many requests") {
        RemoteFailure::RateLimited
    } else if lowered.contains("rejected by user") || lowered.contains("cancelled") {
        RemoteFailure::Cancelled
    } else if lowered.contains("network")
        || lowered.contains("connection")
        || lowered.contains("timed out")
        || lowered.contains("timeout")
    {
        RemoteFailure::Network
    } else {
        RemoteFailure::Other
    }
}

/// Errors surfaced by the posting pipeline.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("wallet not connected")]
    NotConnected,

    #[error(transparent)]
    Content(#[from] ContentViolation),

    #[error("rate limit exceeded, retry in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error(transparent)]
    Wallet(WalletError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Sponsor(#[from] SponsorError),
}

impl From<WalletError> for PostError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::NotConnected => PostError::NotConnected,
            other => PostError::Wallet(other),
        }
    }
}

impl PostError {
    /// Fixed user-facing message for this failure.
    pub fn user_message(&self) -> String {
        match self {
            PostError::NotConnected => "Connect a wallet before posting".to_string(),
            PostError::Content(ContentViolation::Empty) => {
                "Message cannot be empty".to_string()
            }
            PostError::Content(ContentViolation::TooLong { max, .. }) => {
                format!("Message too long (max {} characters)", max)
            }
            PostError::Content(ContentViolation::Prohibited) => {
                "Message contains prohibited content".to_string()
            }
            PostError::RateLimited { retry_after_secs } => {
                format!(
                    "Too many messages, try again in {} seconds",
                    retry_after_secs
                )
            }
            PostError::Wallet(WalletError::Signing(text)) => {
                match classify_remote(text) {
                    RemoteFailure::Cancelled => "Transaction was cancelled".to_string(),
                    _ => "Failed to sign transaction".to_string(),
                }
            }
            PostError::Wallet(_) => "Wallet error, reconnect and try again".to_string(),
            PostError::Chain(e) => match classify_remote(&e.to_string()) {
                RemoteFailure::InsufficientFunds => {
                    "Insufficient funds for transaction fees".to_string()
                }
                RemoteFailure::Network => "Network connection failed".to_string(),
                _ => "Transaction failed".to_string(),
            },
            PostError::Sponsor(SponsorError::Unavailable(_)) => {
                "Fee sponsorship unavailable".to_string()
            }
            PostError::Sponsor(e) => match classify_remote(&e.to_string()) {
                RemoteFailure::RateLimited => {
                    "Sponsorship rate limit reached, try again later".to_string()
                }
                RemoteFailure::Network => "Network connection failed".to_string(),
                _ => "Fee sponsorship failed".to_string(),
            },
        }
    }
}
