//! Fullnode REST client with timeout and failover handling.
//!
//! # Responsibilities
//! - Call contract view functions (feed fallback reads)
//! - Query account state and balances
//! - Encode, submit, and confirm user transactions
//! - Provide a health probe for node connectivity

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::{interval, timeout};

use crate::chain::types::{
    AccountInfo, Address, Authenticator, ChainError, ChainResult, CommittedTransaction,
    LedgerInfo, TransactionRequest, TxHash,
};
use crate::config::ChainConfig;

/// Base units per whole coin for display conversion.
pub const BASE_UNITS_PER_COIN: u64 = 100_000_000;

/// REST client over the primary node plus failovers.
#[derive(Debug, Clone)]
pub struct ChainClient {
    http: reqwest::Client,
    /// Base URLs, primary first.
    endpoints: Vec<String>,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a new chain client from configuration.
    pub fn new(config: ChainConfig) -> ChainResult<Self> {
        let mut endpoints = Vec::new();
        let primary: url::Url = config.fullnode_url.parse().map_err(|e| {
            ChainError::Http(format!(
                "invalid node URL '{}': {}",
                config.fullnode_url, e
            ))
        })?;
        endpoints.push(primary.to_string().trim_end_matches('/').to_string());

        for url_str in &config.failover_urls {
            match url_str.parse::<url::Url>() {
                Ok(u) => endpoints.push(u.to_string().trim_end_matches('/').to_string()),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover node URL"),
            }
        }

        Ok(Self {
            http: reqwest::Client::new(),
            endpoints,
            timeout_duration: Duration::from_secs(config.request_timeout_secs),
            config,
        })
    }

    /// Run a request against each endpoint in order until one succeeds.
    ///
    /// Transport errors and timeouts advance to the next endpoint; an API
    /// error response is returned immediately since every node would give
    /// the same answer.
    async fn with_failover<T, F, Fut>(&self, op: &str, f: F) -> ChainResult<T>
    where
        F: Fn(String) -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
        T: serde::de::DeserializeOwned,
    {
        for (i, base) in self.endpoints.iter().enumerate() {
            match timeout(self.timeout_duration, f(base.clone())).await {
                Ok(Ok(response)) => {
                    let status = response.status();
                    if !status.is_success() {
                        let message = response.text().await.unwrap_or_default();
                        return Err(ChainError::Api {
                            status: status.as_u16(),
                            message,
                        });
                    }
                    return response
                        .json::<T>()
                        .await
                        .map_err(|e| ChainError::Decode(e.to_string()));
                }
                Ok(Err(e)) => {
                    tracing::warn!(endpoint_idx = i, op = op, error = %e, "node request failed, trying next endpoint");
                }
                Err(_) => {
                    tracing::warn!(endpoint_idx = i, op = op, "node request timed out, trying next endpoint");
                }
            }
        }
        Err(ChainError::Timeout(self.config.request_timeout_secs))
    }

    /// Fetch ledger metadata from the node index endpoint.
    pub async fn ledger_info(&self) -> ChainResult<LedgerInfo> {
        self.with_failover("ledger_info", |base| self.http.get(base).send())
            .await
    }

    /// Call a contract view function and return its raw result values.
    pub async fn view(
        &self,
        function: &str,
        type_arguments: Vec<String>,
        arguments: Vec<serde_json::Value>,
    ) -> ChainResult<Vec<serde_json::Value>> {
        let body = serde_json::json!({
            "function": function,
            "type_arguments": type_arguments,
            "arguments": arguments,
        });
        self.with_failover("view", |base| {
            self.http.post(format!("{}/view", base)).json(&body).send()
        })
        .await
    }

    /// Fetch account state (sequence number) for transaction building.
    pub async fn account(&self, address: &Address) -> ChainResult<AccountInfo> {
        self.with_failover("account", |base| {
            self.http
                .get(format!("{}/accounts/{}", base, address))
                .send()
        })
        .await
    }

    /// Get the native coin balance of an address in base units.
    pub async fn account_balance(&self, address: &Address) -> ChainResult<u64> {
        let result = self
            .view(
                &format!("{}::coin::balance", self.config.framework_address),
                vec![format!(
                    "{}::native_coin::NativeCoin",
                    self.config.framework_address
                )],
                vec![serde_json::Value::String(address.to_string())],
            )
            .await?;
        parse_u64_value(result.first())
    }

    /// Convert a base-unit balance to whole coins for display.
    pub fn to_display_coins(balance: u64) -> f64 {
        balance as f64 / BASE_UNITS_PER_COIN as f64
    }

    /// Ask the node for the signing message of a built transaction.
    ///
    /// Returns the raw bytes the sender must sign.
    pub async fn encode_submission(&self, tx: &TransactionRequest) -> ChainResult<Vec<u8>> {
        let encoded: String = self
            .with_failover("encode_submission", |base| {
                self.http
                    .post(format!("{}/transactions/encode_submission", base))
                    .json(tx)
                    .send()
            })
            .await?;
        let hex_part = encoded.strip_prefix("0x").unwrap_or(&encoded);
        hex::decode(hex_part).map_err(|e| ChainError::Decode(format!("signing message: {}", e)))
    }

    /// Submit a signed transaction directly (sender pays fees).
    pub async fn submit(
        &self,
        tx: &TransactionRequest,
        authenticator: &Authenticator,
    ) -> ChainResult<TxHash> {
        let mut body = serde_json::to_value(tx).map_err(|e| ChainError::Decode(e.to_string()))?;
        body["signature"] =
            serde_json::to_value(authenticator).map_err(|e| ChainError::Decode(e.to_string()))?;

        let pending: CommittedTransaction = self
            .with_failover("submit", |base| {
                self.http
                    .post(format!("{}/transactions", base))
                    .json(&body)
                    .send()
            })
            .await?;
        Ok(pending.hash)
    }

    /// Look up a transaction by hash. `None` means the node does not know it yet.
    pub async fn transaction_by_hash(
        &self,
        hash: &TxHash,
    ) -> ChainResult<Option<CommittedTransaction>> {
        let result: ChainResult<CommittedTransaction> = self
            .with_failover("transaction_by_hash", |base| {
                self.http
                    .get(format!("{}/transactions/by_hash/{}", base, hash))
                    .send()
            })
            .await;
        match result {
            Ok(tx) => Ok(Some(tx)),
            Err(ChainError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Poll until a transaction is committed, then check its VM status.
    pub async fn wait_for_transaction(&self, hash: &TxHash) -> ChainResult<CommittedTransaction> {
        let timeout_duration = Duration::from_secs(self.config.confirm_timeout_secs);
        let poll_interval = Duration::from_millis(self.config.confirm_poll_ms);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);
            loop {
                ticker.tick().await;

                let tx = match self.transaction_by_hash(hash).await? {
                    Some(tx) => tx,
                    None => {
                        tracing::debug!(tx_hash = %hash, "transaction not yet known to node");
                        continue;
                    }
                };

                if tx.is_pending() {
                    tracing::debug!(tx_hash = %hash, "transaction pending");
                    continue;
                }

                if tx.success == Some(false) {
                    let vm_status = tx.vm_status.clone().unwrap_or_else(|| "unknown".to_string());
                    return Err(ChainError::ExecutionFailed(vm_status));
                }

                return Ok(tx);
            }
        })
        .await;

        match result {
            Ok(inner) => inner,
            Err(_) => Err(ChainError::ConfirmationTimeout(
                self.config.confirm_timeout_secs,
            )),
        }
    }

    /// Check whether the primary or any failover node is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.ledger_info().await.is_ok()
    }

    /// Transaction expiry timestamp derived from the configured window.
    pub fn expiration_timestamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        now + self.config.expiration_secs
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}

fn parse_u64_value(value: Option<&serde_json::Value>) -> ChainResult<u64> {
    match value {
        Some(serde_json::Value::String(s)) => s
            .parse()
            .map_err(|_| ChainError::Decode(format!("expected u64, got '{}'", s))),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| ChainError::Decode(format!("expected u64, got {}", n))),
        other => Err(ChainError::Decode(format!("expected u64, got {:?}", other))),
    }
}
