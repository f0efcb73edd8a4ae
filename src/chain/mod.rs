//! Fullnode REST integration: typed wire structs and the failover client.

pub mod client;
pub mod types;

pub use client::{ChainClient, BASE_UNITS_PER_COIN};
pub use types::{
    AccountInfo, Address, Authenticator, ChainError, ChainResult, CommittedTransaction,
    EntryFunctionPayload, LedgerInfo, TransactionRequest, TxHash,
};
