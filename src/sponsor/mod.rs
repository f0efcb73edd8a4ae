//! Fee-sponsorship ("gas station") client.
//!
//! Submits a built, sender-signed transaction to the sponsorship service,
//! which either pays the fees and forwards it to the chain or rejects it.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::chain::{Authenticator, TransactionRequest, TxHash};
use crate::config::SponsorConfig;

/// Errors from the sponsorship service.
#[derive(Debug, Error)]
pub enum SponsorError {
    /// No API key configured or sponsorship disabled.
    #[error("fee sponsorship unavailable: {0}")]
    Unavailable(String),

    /// The sponsor declined to pay for this transaction.
    #[error("sponsorship rejected: {0}")]
    Rejected(String),

    /// HTTP transport failure.
    #[error("sponsor request failed: {0}")]
    Http(String),

    /// Non-success HTTP status from the sponsor API.
    #[error("sponsor API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("unexpected sponsor response: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct SponsorResponse {
    #[serde(default)]
    transaction_hash: Option<TxHash>,
    #[serde(default)]
    error: Option<String>,
}

/// Availability summary for status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorStatus {
    pub available: bool,
    pub message: String,
}

/// Client for the fee-sponsorship API.
#[derive(Debug, Clone)]
pub struct SponsorClient {
    http: reqwest::Client,
    config: SponsorConfig,
}

impl SponsorClient {
    pub fn new(config: SponsorConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Whether sponsorship can be attempted at all.
    pub fn available(&self) -> bool {
        self.config.enabled && !self.config.api_key.is_empty()
    }

    /// Availability summary for the status command.
    pub fn status(&self) -> SponsorStatus {
        if self.available() {
            SponsorStatus {
                available: true,
                message: "fee sponsorship available".to_string(),
            }
        } else if !self.config.enabled {
            SponsorStatus {
                available: false,
                message: "fee sponsorship disabled in configuration".to_string(),
            }
        } else {
            SponsorStatus {
                available: false,
                message: "fee sponsorship unavailable: API key not configured".to_string(),
            }
        }
    }

    /// Gas cap the sponsor enforces.
    pub fn max_gas_amount(&self) -> u64 {
        self.config.max_gas_amount
    }

    /// Submit a signed transaction for sponsored execution.
    pub async fn sponsor_submit(
        &self,
        tx: &TransactionRequest,
        sender_authenticator: &Authenticator,
    ) -> Result<TxHash, SponsorError> {
        if !self.available() {
            return Err(SponsorError::Unavailable(
                "API key not configured".to_string(),
            ));
        }

        let body = serde_json::json!({
            "transaction": tx,
            "sender_authenticator": sender_authenticator,
        });

        let response = self
            .http
            .post(format!("{}/transactions/sponsor", self.config.url))
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SponsorError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SponsorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SponsorResponse = response
            .json()
            .await
            .map_err(|e| SponsorError::Decode(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(SponsorError::Rejected(error));
        }
        match parsed.transaction_hash {
            Some(hash) => {
                tracing::info!(tx_hash = %hash, "sponsored submission accepted");
                Ok(hash)
            }
            None => Err(SponsorError::Decode(
                "response carried neither hash nor error".to_string(),
            )),
        }
    }
}
