//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An account address on the chain, canonicalized to lowercase 0x-hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse and canonicalize an address string.
    pub fn parse(s: &str) -> Result<Self, ChainError> {
        let hex_part = s.strip_prefix("0x").unwrap_or(s);
        if hex_part.is_empty() || hex_part.len() > 64 {
            return Err(ChainError::InvalidAddress(s.to_string()));
        }
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChainError::InvalidAddress(s.to_string()));
        }
        Ok(Self(format!("0x{}", hex_part.to_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A transaction hash as returned by the node or the sponsor service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entry-function call payload for a user transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    /// Fully qualified function, e.g. `0xabc::billboard::send_message`.
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<serde_json::Value>,
}

impl EntryFunctionPayload {
    pub fn new(function: String, arguments: Vec<serde_json::Value>) -> Self {
        Self {
            payload_type: "entry_function_payload".to_string(),
            function,
            type_arguments: Vec::new(),
            arguments,
        }
    }
}

/// An unsigned user transaction in the node's wire format.
///
/// Numeric fields are strings per the node's JSON conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub sender: Address,
    pub sequence_number: String,
    pub max_gas_amount: String,
    pub gas_unit_price: String,
    pub expiration_timestamp_secs: String,
    pub payload: EntryFunctionPayload,
    /// Set for sponsored transactions; the fee payer signs separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<bool>,
}

impl TransactionRequest {
    /// Whether this transaction was built for fee sponsorship.
    pub fn is_sponsored(&self) -> bool {
        self.fee_payer.unwrap_or(false)
    }
}

/// Sender authenticator: public key plus signature over the signing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authenticator {
    #[serde(rename = "type")]
    pub auth_type: String,
    pub public_key: String,
    pub signature: String,
}

impl Authenticator {
    pub fn ed25519(public_key: String, signature: String) -> Self {
        Self {
            auth_type: "ed25519_signature".to_string(),
            public_key,
            signature,
        }
    }
}

/// Account state returned by the node.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    pub sequence_number: String,
}

/// Ledger metadata from the node index endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u64,
    pub ledger_version: String,
    pub ledger_timestamp: String,
}

/// A transaction as reported by the node after submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CommittedTransaction {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub hash: TxHash,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl CommittedTransaction {
    /// Pending transactions have not yet been executed.
    pub fn is_pending(&self) -> bool {
        self.tx_type == "pending_transaction"
    }
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// HTTP transport failure (connection refused, DNS, TLS).
    #[error("node request failed: {0}")]
    Http(String),

    /// Request timed out against every configured node.
    #[error("node request timed out after {0} seconds")]
    Timeout(u64),

    /// The node returned a non-success status.
    #[error("node API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("unexpected node response: {0}")]
    Decode(String),

    /// Malformed account address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Transaction was executed but the VM rejected it.
    #[error("transaction failed on-chain: {0}")]
    ExecutionFailed(String),

    /// Transaction was not committed within the confirmation window.
    #[error("transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_canonicalization() {
        let addr = Address::parse("0xABCdef01").unwrap();
        assert_eq!(addr.as_str(), "0xabcdef01");

        let addr = Address::parse("abcdef01").unwrap();
        assert_eq!(addr.as_str(), "0xabcdef01");
    }

    #[test]
    fn test_address_rejects_garbage() {
        assert!(Address::parse("").is_err());
        assert!(Address::parse("0x").is_err());
        assert!(Address::parse("0xnothex").is_err());
        let too_long = format!("0x{}", "a".repeat(65));
        assert!(Address::parse(&too_long).is_err());
    }

    #[test]
    fn test_transaction_serializes_without_fee_payer_field() {
        let tx = TransactionRequest {
            sender: Address::parse("0x1").unwrap(),
            sequence_number: "0".to_string(),
            max_gas_amount: "50".to_string(),
            gas_unit_price: "100".to_string(),
            expiration_timestamp_secs: "1000".to_string(),
            payload: EntryFunctionPayload::new("0x1::billboard::send_message".to_string(), vec![]),
            fee_payer: None,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert!(json.get("fee_payer").is_none());
        assert!(!tx.is_sponsored());
    }

    #[test]
    fn test_pending_detection() {
        let tx: CommittedTransaction = serde_json::from_value(serde_json::json!({
            "type": "pending_transaction",
            "hash": "0xdead",
        }))
        .unwrap();
        assert!(tx.is_pending());
        assert!(tx.success.is_none());
    }
}
