//! GraphQL indexer client.
//!
//! Queries a Hasura-style endpoint mirroring the billboard contract's
//! messages into a `billboard_messages` table with `author_address`,
//! `time` (microseconds, as a string), and `message` columns.

use serde::Deserialize;
use std::time::Duration;

use crate::config::IndexerConfig;
use crate::indexer::IndexerError;

const RECENT_MESSAGES_QUERY: &str = r#"
query RecentMessages($limit: Int) {
  billboard_messages(limit: $limit, order_by: {time: desc}) {
    author_address
    time
    message
  }
}
"#;

const MESSAGES_BY_AUTHOR_QUERY: &str = r#"
query MessagesByAuthor($author: String!) {
  billboard_messages(where: {author_address: {_eq: $author}}, order_by: {time: desc}) {
    author_address
    time
    message
  }
}
"#;

const MESSAGES_SINCE_QUERY: &str = r#"
query MessagesSince($since: String!) {
  billboard_messages(where: {time: {_gt: $since}}, order_by: {time: desc}) {
    author_address
    time
    message
  }
}
"#;

const MESSAGE_COUNT_QUERY: &str = r#"
query MessageCount {
  billboard_messages_aggregate {
    aggregate {
      count
    }
  }
}
"#;

/// A row from the indexer's message table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IndexedMessage {
    pub author_address: String,
    /// Chain timestamp in microseconds, stringified by the indexer.
    pub time: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct MessagesData {
    billboard_messages: Vec<IndexedMessage>,
}

#[derive(Debug, Deserialize)]
struct CountData {
    billboard_messages_aggregate: AggregateWrapper,
}

#[derive(Debug, Deserialize)]
struct AggregateWrapper {
    aggregate: CountAggregate,
}

#[derive(Debug, Deserialize)]
struct CountAggregate {
    count: u64,
}

/// Client for the billboard GraphQL indexer.
#[derive(Debug, Clone)]
pub struct IndexerClient {
    http: reqwest::Client,
    config: IndexerConfig,
}

impl IndexerClient {
    pub fn new(config: IndexerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Execute a GraphQL query and unwrap the response envelope.
    ///
    /// GraphQL reports failures in an `errors` array on HTTP 200, so both
    /// layers are checked.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, IndexerError> {
        let payload = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let mut request = self
            .http
            .post(&self.config.url)
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .json(&payload);
        if let Some(secret) = &self.config.admin_secret {
            request = request.header("x-hasura-admin-secret", secret);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IndexerError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexerError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| IndexerError::Decode(e.to_string()))?;

        if let Some(errors) = envelope.errors {
            let combined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(IndexerError::GraphQl(combined));
        }

        envelope
            .data
            .ok_or_else(|| IndexerError::Decode("response had neither data nor errors".to_string()))
    }

    /// Most recent messages, newest first.
    pub async fn recent_messages(&self, limit: u32) -> Result<Vec<IndexedMessage>, IndexerError> {
        let data: MessagesData = self
            .execute(RECENT_MESSAGES_QUERY, serde_json::json!({ "limit": limit }))
            .await?;
        Ok(data.billboard_messages)
    }

    /// All messages posted by one author, newest first.
    pub async fn messages_by_author(
        &self,
        author: &str,
    ) -> Result<Vec<IndexedMessage>, IndexerError> {
        let data: MessagesData = self
            .execute(
                MESSAGES_BY_AUTHOR_QUERY,
                serde_json::json!({ "author": author }),
            )
            .await?;
        Ok(data.billboard_messages)
    }

    /// Messages strictly newer than the given microsecond timestamp.
    pub async fn messages_since(
        &self,
        since_usecs: u64,
    ) -> Result<Vec<IndexedMessage>, IndexerError> {
        let data: MessagesData = self
            .execute(
                MESSAGES_SINCE_QUERY,
                serde_json::json!({ "since": since_usecs.to_string() }),
            )
            .await?;
        Ok(data.billboard_messages)
    }

    /// Total number of indexed messages.
    pub async fn message_count(&self) -> Result<u64, IndexerError> {
        let data: CountData = self
            .execute(MESSAGE_COUNT_QUERY, serde_json::json!({}))
            .await?;
        Ok(data.billboard_messages_aggregate.aggregate.count)
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_errors_wins_over_data() {
        let raw = r#"{"data": null, "errors": [{"message": "field missing"}, {"message": "bad arg"}]}"#;
        let envelope: GraphQlResponse<MessagesData> = serde_json::from_str(raw).unwrap();
        assert!(envelope.data.is_none());
        let errors = envelope.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "field missing");
    }

    #[test]
    fn test_message_rows_deserialize() {
        let raw = r#"{"data": {"billboard_messages": [
            {"author_address": "0xabc", "time": "1700000000000000", "message": "hello"}
        ]}}"#;
        let envelope: GraphQlResponse<MessagesData> = serde_json::from_str(raw).unwrap();
        let rows = envelope.data.unwrap().billboard_messages;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message, "hello");
        assert_eq!(rows[0].time, "1700000000000000");
    }

    #[test]
    fn test_count_aggregate_deserializes() {
        let raw = r#"{"data": {"billboard_messages_aggregate": {"aggregate": {"count": 42}}}}"#;
        let envelope: GraphQlResponse<CountData> = serde_json::from_str(raw).unwrap();
        assert_eq!(
            envelope
                .data
                .unwrap()
                .billboard_messages_aggregate
                .aggregate
                .count,
            42
        );
    }

    #[tokio::test]
    async fn test_unreachable_indexer_is_http_error() {
        let config = IndexerConfig {
            url: "http://127.0.0.1:19999/v1/graphql".to_string(),
            request_timeout_secs: 1,
            ..IndexerConfig::default()
        };
        let client = IndexerClient::new(config);
        let result = client.message_count().await;
        assert!(matches!(result, Err(IndexerError::Http(_))));
    }
}
