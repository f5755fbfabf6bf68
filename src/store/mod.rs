//! Content-store collaborator
//!
//! Chunks are pushed to a [`ContentStore`] in bounded batches. A store that
//! rejects a batch as too large gets the same chunks again in halved batches
//! until the batch size would drop below the configured floor.

pub mod corpus;
pub mod memory;

pub use corpus::{CorpusBuilder, file_memo, should_index_file};
pub use memory::InMemoryStore;

use crate::chunking::{Chunk, MetadataMap};
use crate::logging::Logger;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by a content store
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("batch of {size} chunks exceeds the store limit")]
    BatchTooLarge { size: usize },

    #[error("content store failure: {0}")]
    Backend(String),
}

/// One ranked query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    pub text: String,
    /// Higher is more similar, in `0.0..=1.0`
    pub score: f32,
    pub metadata: MetadataMap,
}

/// Similarity-indexed chunk storage
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert or replace chunks by id
    async fn upsert(&self, chunks: &[Chunk]) -> Result<(), StoreError>;

    /// Up to `limit` chunks ranked against `text`, restricted to chunks whose
    /// metadata contains every entry of `filter`
    async fn query(
        &self,
        text: &str,
        filter: &MetadataMap,
        limit: usize,
    ) -> Result<Vec<QueryMatch>, StoreError>;
}

/// Upsert `chunks` in batches of at most `max_batch_size`
///
/// On [`StoreError::BatchTooLarge`] the batch size is halved and the same
/// batch retried, as long as the current size is above `min_batch_size`.
/// The reduced size is kept for the remaining batches. Returns the number
/// of chunks stored.
pub async fn upsert_batched(
    store: &dyn ContentStore,
    chunks: &[Chunk],
    max_batch_size: usize,
    min_batch_size: usize,
    logger: &Logger,
) -> Result<usize, StoreError> {
    let mut batch_size = max_batch_size.max(1);
    let mut offset = 0;

    while offset < chunks.len() {
        let end = (offset + batch_size).min(chunks.len());
        match store.upsert(&chunks[offset..end]).await {
            Ok(()) => offset = end,
            Err(StoreError::BatchTooLarge { size }) if batch_size > min_batch_size => {
                batch_size = (batch_size / 2).max(1);
                logger.warn(
                    "store",
                    &format!(
                        "Batch of {} chunks rejected, retrying with batch size {}",
                        size, batch_size
                    ),
                );
            }
            Err(error) => return Err(error),
        }
    }

    Ok(chunks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::chunk;

    fn chunks(count: usize) -> Vec<Chunk> {
        let text = "word ".repeat(count * 4);
        let mut chunks = chunk(&text, 20, 0);
        chunks.truncate(count);
        assert_eq!(chunks.len(), count);
        chunks
    }

    #[tokio::test]
    async fn test_batches_respect_max_size() {
        let store = InMemoryStore::new();
        let stored = upsert_batched(&store, &chunks(10), 4, 1, &Logger::quiet())
            .await
            .unwrap();

        assert_eq!(stored, 10);
        assert_eq!(store.batch_sizes(), vec![4, 4, 2]);
        assert_eq!(store.len(), 10);
    }

    #[tokio::test]
    async fn test_halves_on_batch_too_large() {
        let store = InMemoryStore::new().with_batch_limit(3);
        upsert_batched(&store, &chunks(10), 8, 2, &Logger::quiet())
            .await
            .unwrap();

        assert_eq!(store.batch_sizes(), vec![2, 2, 2, 2, 2]);
        assert_eq!(store.len(), 10);
    }

    #[tokio::test]
    async fn test_gives_up_at_minimum_size() {
        let store = InMemoryStore::new().with_batch_limit(1);
        let result = upsert_batched(&store, &chunks(10), 8, 4, &Logger::quiet()).await;

        assert!(matches!(result, Err(StoreError::BatchTooLarge { size: 4 })));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_stores_nothing() {
        let store = InMemoryStore::new();
        let stored = upsert_batched(&store, &[], 8, 4, &Logger::quiet())
            .await
            .unwrap();
        assert_eq!(stored, 0);
        assert!(store.batch_sizes().is_empty());
    }
}
