//! Feed watcher: polls the indexer for messages newer than the last seen
//! timestamp and delivers each new batch over a channel.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::indexer::client::{IndexedMessage, IndexerClient};

/// Polling watcher over the indexer.
pub struct FeedWatcher {
    client: IndexerClient,
    /// Newest timestamp already delivered, in microseconds.
    last_seen_usecs: u64,
    poll_interval: Duration,
}

impl FeedWatcher {
    /// Create a watcher starting after `last_seen_usecs`.
    pub fn new(client: IndexerClient, last_seen_usecs: u64) -> Self {
        let poll_interval = Duration::from_millis(client.config().poll_interval_ms);
        Self {
            client,
            last_seen_usecs,
            poll_interval,
        }
    }

    /// Spawn the poll loop, returning the receiving end of the batch channel.
    ///
    /// Poll errors are logged and the loop continues; dropping the receiver
    /// stops the loop on its next delivery attempt.
    pub fn spawn(mut self) -> mpsc::Receiver<Vec<IndexedMessage>> {
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            tracing::info!(
                since_usecs = self.last_seen_usecs,
                interval_ms = self.poll_interval.as_millis() as u64,
                "feed watcher started"
            );
            loop {
                match self.poll_once().await {
                    Ok(Some(batch)) => {
                        if tx.send(batch).await.is_err() {
                            tracing::debug!("feed watcher receiver dropped, stopping");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "feed watcher poll failed");
                    }
                }
                sleep(self.poll_interval).await;
            }
        });

        rx
    }

    /// One poll cycle; advances the high-water mark on new messages.
    async fn poll_once(&mut self) -> Result<Option<Vec<IndexedMessage>>, crate::indexer::IndexerError> {
        let new_messages = self.client.messages_since(self.last_seen_usecs).await?;
        if new_messages.is_empty() {
            return Ok(None);
        }

        // Rows arrive newest-first; the first row carries the new high-water mark.
        if let Some(newest) = new_messages.first() {
            if let Ok(ts) = newest.time.parse::<u64>() {
                self.last_seen_usecs = self.last_seen_usecs.max(ts);
            }
        }

        tracing::debug!(count = new_messages.len(), "feed watcher delivered batch");
        Ok(Some(new_messages))
    }
}
