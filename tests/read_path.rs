//! Read-path integration tests: indexer first, chain fallback, empty last.

mod common;

use billboard::chain::ChainClient;
use billboard::config::{ChainConfig, IndexerConfig};
use billboard::feed::FeedService;
use billboard::indexer::IndexerClient;

fn chain_config(port: u16) -> ChainConfig {
    ChainConfig {
        fullnode_url: format!("http://127.0.0.1:{}/v1", port),
        failover_urls: Vec::new(),
        request_timeout_secs: 2,
        ..ChainConfig::default()
    }
}

fn indexer_config(port: u16) -> IndexerConfig {
    IndexerConfig {
        url: format!("http://127.0.0.1:{}/v1/graphql", port),
        request_timeout_secs: 2,
        ..IndexerConfig::default()
    }
}

fn feed_service(indexer_port: u16, chain_port: u16) -> FeedService {
    FeedService::new(
        IndexerClient::new(indexer_config(indexer_port)),
        ChainClient::new(chain_config(chain_port)).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn indexer_serves_the_feed_when_healthy() {
    let indexer_port = 21010;
    common::start_mock_backend(
        ([127, 0, 0, 1], indexer_port).into(),
        r#"{"data": {"billboard_messages": [
            {"author_address": "0xbbb", "time": "2000", "message": "newer"},
            {"author_address": "0xaaa", "time": "1000", "message": "older"}
        ]}}"#,
    )
    .await;

    // Chain port is closed; it must not be needed.
    let feed = feed_service(indexer_port, 21011);
    let messages = feed.messages(10).await;

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "newer");
    assert_eq!(messages[1].content, "older");
}

#[tokio::test]
async fn indexer_failure_falls_back_to_chain_view() {
    let chain_port = 21020;
    common::start_mock_backend(
        ([127, 0, 0, 1], chain_port).into(),
        r#"[[
            {"content": "from chain", "author": "0xccc", "timestamp": "3000"},
            {"content": "from chain too", "author": "0xddd", "timestamp": "4000"}
        ]]"#,
    )
    .await;

    // Indexer port is closed, forcing the fallback.
    let feed = feed_service(21021, chain_port);
    let messages = feed.messages(10).await;

    assert_eq!(messages.len(), 2);
    // Fallback output is still newest-first.
    assert_eq!(messages[0].content, "from chain too");
    assert_eq!(messages[1].content, "from chain");
}

#[tokio::test]
async fn fallback_respects_the_limit() {
    let chain_port = 21030;
    common::start_mock_backend(
        ([127, 0, 0, 1], chain_port).into(),
        r#"[[
            {"content": "one", "author": "0x1", "timestamp": "100"},
            {"content": "two", "author": "0x1", "timestamp": "200"},
            {"content": "three", "author": "0x1", "timestamp": "300"}
        ]]"#,
    )
    .await;

    let feed = feed_service(21031, chain_port);
    let messages = feed.messages(2).await;

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "three");
}

#[tokio::test]
async fn both_paths_down_yields_empty_feed() {
    // Both ports closed: the read path must degrade to empty, not error.
    let feed = feed_service(21041, 21042);
    assert!(feed.messages(10).await.is_empty());
    assert_eq!(feed.count().await, 0);
}

#[tokio::test]
async fn count_falls_back_to_chain_view() {
    let chain_port = 21050;
    common::start_mock_backend(([127, 0, 0, 1], chain_port).into(), r#"["7"]"#).await;

    let feed = feed_service(21051, chain_port);
    assert_eq!(feed.count().await, 7);
}

#[tokio::test]
async fn author_filter_applies_in_fallback() {
    let chain_port = 21060;
    common::start_mock_backend(
        ([127, 0, 0, 1], chain_port).into(),
        r#"[[
            {"content": "mine", "author": "0xaaa", "timestamp": "100"},
            {"content": "theirs", "author": "0xbbb", "timestamp": "200"}
        ]]"#,
    )
    .await;

    let feed = feed_service(21061, chain_port);
    let author = "0xaaa".parse().unwrap();
    let messages = feed.messages_by_author(&author).await;

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "mine");
}

#[tokio::test]
async fn graphql_errors_on_200_trigger_fallback() {
    let indexer_port = 21070;
    common::start_mock_backend(
        ([127, 0, 0, 1], indexer_port).into(),
        r#"{"data": null, "errors": [{"message": "table not tracked"}]}"#,
    )
    .await;

    let chain_port = 21071;
    common::start_mock_backend(
        ([127, 0, 0, 1], chain_port).into(),
        r#"[[{"content": "fallback", "author": "0xeee", "timestamp": "500"}]]"#,
    )
    .await;

    let feed = feed_service(indexer_port, chain_port);
    let messages = feed.messages(10).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "fallback");
}
