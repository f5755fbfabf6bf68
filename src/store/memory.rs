//! Process-local content store ranked by term overlap

use super::{ContentStore, QueryMatch, StoreError};
use crate::chunking::{Chunk, MetadataMap};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    chunks: BTreeMap<String, Chunk>,
    batch_sizes: Vec<usize>,
}

/// In-memory [`ContentStore`]
///
/// Similarity is the share of query terms found in a chunk. An optional
/// batch limit makes the store reject oversized upserts the way hosted
/// vector stores do.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
    batch_limit: Option<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject upserts larger than `limit` chunks
    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = Some(limit);
        self
    }

    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.chunks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sizes of the upserts accepted so far, in order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.lock()
            .map(|inner| inner.batch_sizes.clone())
            .unwrap_or_default()
    }

    /// Every stored chunk, ordered by id
    pub fn chunks(&self) -> Vec<Chunk> {
        self.lock()
            .map(|inner| inner.chunks.values().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<(), StoreError> {
        if let Some(limit) = self.batch_limit
            && chunks.len() > limit
        {
            return Err(StoreError::BatchTooLarge { size: chunks.len() });
        }

        let mut inner = self.lock()?;
        for chunk in chunks {
            inner.chunks.insert(chunk.id.clone(), chunk.clone());
        }
        inner.batch_sizes.push(chunks.len());
        Ok(())
    }

    async fn query(
        &self,
        text: &str,
        filter: &MetadataMap,
        limit: usize,
    ) -> Result<Vec<QueryMatch>, StoreError> {
        let wanted = terms(text);
        if wanted.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let inner = self.lock()?;
        let mut matches: Vec<QueryMatch> = inner
            .chunks
            .values()
            .filter(|chunk| {
                filter
                    .iter()
                    .all(|(key, value)| chunk.metadata.get(key) == Some(value))
            })
            .filter_map(|chunk| {
                let found = terms(&chunk.text);
                let shared = wanted.intersection(&found).count();
                (shared > 0).then(|| QueryMatch {
                    id: chunk.id.clone(),
                    text: chunk.text.clone(),
                    score: shared as f32 / wanted.len() as f32,
                    metadata: chunk.metadata.clone(),
                })
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        matches.truncate(limit);
        Ok(matches)
    }
}

/// Lowercase alphanumeric terms of two or more characters
fn terms(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|term| term.chars().count() > 1)
        .map(|term| term.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::{Chunker, MetadataValue};

    fn document(source: &str, text: &str, repo: &str) -> Vec<Chunk> {
        let mut metadata = MetadataMap::new();
        metadata.insert("repo_name".into(), MetadataValue::from(repo));
        Chunker::default().chunk_document(source, text, &metadata)
    }

    #[tokio::test]
    async fn test_query_ranks_by_overlap() {
        let store = InMemoryStore::new();
        store
            .upsert(&document("a.md", "The scanner walks the repository tree", "one"))
            .await
            .unwrap();
        store
            .upsert(&document("b.md", "The chunker splits text", "one"))
            .await
            .unwrap();

        let matches = store
            .query("repository scanner", &MetadataMap::new(), 5)
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].metadata["source"], MetadataValue::from("a.md"));
        assert_eq!(matches[0].score, 1.0);
    }

    #[tokio::test]
    async fn test_query_applies_metadata_filter() {
        let store = InMemoryStore::new();
        store.upsert(&document("a.md", "shared words", "one")).await.unwrap();
        store.upsert(&document("b.md", "shared words", "two")).await.unwrap();

        let mut filter = MetadataMap::new();
        filter.insert("repo_name".into(), MetadataValue::from("two"));
        let matches = store.query("shared", &filter, 5).await.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].metadata["repo_name"], MetadataValue::from("two"));
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = InMemoryStore::new();
        let chunks = document("a.md", "same text", "one");
        store.upsert(&chunks).await.unwrap();
        store.upsert(&chunks).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.batch_sizes(), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_batch_limit() {
        let store = InMemoryStore::new().with_batch_limit(1);
        let mut chunks = document("a.md", "first", "one");
        chunks.extend(document("b.md", "second", "one"));

        let result = store.upsert(&chunks).await;
        assert!(matches!(result, Err(StoreError::BatchTooLarge { size: 2 })));
        assert!(store.is_empty());
    }
}
