//! The message feed: read path over the indexer with a chain fallback.
//!
//! Reads degrade instead of failing: indexer first, then the contract's
//! view function, then an empty feed. Callers never see an error from the
//! feed read path.

pub mod display;

use serde::Deserialize;

use crate::chain::{Address, ChainClient};
use crate::indexer::{IndexedMessage, IndexerClient};

/// A message posted to the billboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub author: String,
    pub content: String,
    /// Chain timestamp in microseconds. Strictly orders the feed.
    pub timestamp_usecs: u64,
}

impl From<IndexedMessage> for Message {
    fn from(row: IndexedMessage) -> Self {
        Self {
            author: row.author_address,
            content: row.message,
            timestamp_usecs: row.time.parse().unwrap_or(0),
        }
    }
}

/// On-chain message shape returned by `get_all_messages`.
#[derive(Debug, Deserialize)]
struct OnChainMessage {
    content: String,
    author: String,
    timestamp: String,
}

impl From<OnChainMessage> for Message {
    fn from(m: OnChainMessage) -> Self {
        Self {
            author: m.author,
            content: m.content,
            timestamp_usecs: m.timestamp.parse().unwrap_or(0),
        }
    }
}

/// Read-side service combining the indexer and the chain fallback.
#[derive(Debug, Clone)]
pub struct FeedService {
    indexer: IndexerClient,
    chain: ChainClient,
    contract: Address,
    module_name: String,
}

impl FeedService {
    pub fn new(indexer: IndexerClient, chain: ChainClient) -> Result<Self, crate::chain::ChainError> {
        let contract = Address::parse(&chain.config().contract_address)?;
        let module_name = chain.config().module_name.clone();
        Ok(Self {
            indexer,
            chain,
            contract,
            module_name,
        })
    }

    fn view_function(&self, name: &str) -> String {
        format!("{}::{}::{}", self.contract, self.module_name, name)
    }

    /// Fetch the most recent messages, newest first.
    ///
    /// Falls back to the chain view function when the indexer fails, and to
    /// an empty feed when both fail.
    pub async fn messages(&self, limit: u32) -> Vec<Message> {
        match self.indexer.recent_messages(limit).await {
            Ok(rows) => sort_newest_first(rows.into_iter().map(Message::from).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "indexer read failed, falling back to chain view");
                self.messages_from_chain(limit).await
            }
        }
    }

    /// Messages by a single author, newest first. Same fallback behavior,
    /// filtering the chain result locally.
    pub async fn messages_by_author(&self, author: &Address) -> Vec<Message> {
        match self.indexer.messages_by_author(author.as_str()).await {
            Ok(rows) => sort_newest_first(rows.into_iter().map(Message::from).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "indexer author read failed, falling back to chain view");
                let mut all = self.messages_from_chain(u32::MAX).await;
                all.retain(|m| m.author == author.as_str());
                all
            }
        }
    }

    /// Total message count: indexer aggregate, then chain view, then zero.
    pub async fn count(&self) -> u64 {
        match self.indexer.message_count().await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "indexer count failed, falling back to chain view");
                self.count_from_chain().await
            }
        }
    }

    async fn messages_from_chain(&self, limit: u32) -> Vec<Message> {
        let result = self
            .chain
            .view(
                &self.view_function("get_all_messages"),
                Vec::new(),
                vec![serde_json::Value::String(self.contract.to_string())],
            )
            .await;

        let values = match result {
            Ok(values) => values,
            Err(e) => {
                tracing::error!(error = %e, "chain fallback read failed, returning empty feed");
                return Vec::new();
            }
        };

        let rows: Vec<OnChainMessage> = match values.into_iter().next() {
            Some(first) => serde_json::from_value(first).unwrap_or_default(),
            None => Vec::new(),
        };

        let mut messages = sort_newest_first(rows.into_iter().map(Message::from).collect());
        messages.truncate(limit as usize);
        messages
    }

    async fn count_from_chain(&self) -> u64 {
        let result = self
            .chain
            .view(
                &self.view_function("get_message_count"),
                Vec::new(),
                vec![serde_json::Value::String(self.contract.to_string())],
            )
            .await;

        match result {
            Ok(values) => match values.first() {
                Some(serde_json::Value::String(s)) => s.parse().unwrap_or(0),
                Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
                _ => 0,
            },
            Err(e) => {
                tracing::error!(error = %e, "chain fallback count failed");
                0
            }
        }
    }
}

fn sort_newest_first(mut messages: Vec<Message>) -> Vec<Message> {
    messages.sort_by(|a, b| b.timestamp_usecs.cmp(&a.timestamp_usecs));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(author: &str, content: &str, ts: u64) -> Message {
        Message {
            author: author.to_string(),
            content: content.to_string(),
            timestamp_usecs: ts,
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let sorted = sort_newest_first(vec![
            msg("0xa", "old", 100),
            msg("0xb", "new", 300),
            msg("0xc", "mid", 200),
        ]);
        let contents: Vec<&str> = sorted.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_indexed_message_conversion() {
        let row = IndexedMessage {
            author_address: "0xabc".to_string(),
            time: "1700000000000000".to_string(),
            message: "hello".to_string(),
        };
        let m = Message::from(row);
        assert_eq!(m.author, "0xabc");
        assert_eq!(m.timestamp_usecs, 1_700_000_000_000_000);
    }

    #[test]
    fn test_unparseable_timestamp_maps_to_zero() {
        let row = IndexedMessage {
            author_address: "0xabc".to_string(),
            time: "not-a-number".to_string(),
            message: "hello".to_string(),
        };
        assert_eq!(Message::from(row).timestamp_usecs, 0);
    }

    #[test]
    fn test_on_chain_rows_deserialize() {
        let raw = serde_json::json!([
            {"content": "first", "author": "0x1", "timestamp": "100"},
            {"content": "second", "author": "0x2", "timestamp": "200"}
        ]);
        let rows: Vec<OnChainMessage> = serde_json::from_value(raw).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(Message::from(rows.into_iter().next().unwrap()).content, "first");
    }
}
