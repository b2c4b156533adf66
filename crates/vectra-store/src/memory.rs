//! In-memory content store.
//!
//! Entries live in a `Vec` behind a `tokio::sync::RwLock`, so query results
//! come back in insertion order. That ordering is load-bearing: the ranker's
//! stable sort falls back to store order for equal similarities, which keeps
//! search results reproducible across identical runs.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use vectra_core::{
    ContentItem, ContentStore, EmbeddingVector, Modality, SimilarityCandidate, StoreError,
};

struct Entry {
    item: ContentItem,
    vector: EmbeddingVector,
}

/// In-memory [`ContentStore`].
///
/// `put` upserts: storing an existing `content_id` replaces the entry in
/// place, keeping its original position. Suitable for demos, tests and
/// single-process deployments; contents vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<Entry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn put(&self, item: &ContentItem, vector: &EmbeddingVector) -> Result<(), StoreError> {
        if item.payload.is_empty() {
            return Err(StoreError::Insert(format!(
                "empty payload for {}",
                item.content_id
            )));
        }

        let mut entries = self.entries.write().await;
        let entry = Entry {
            item: item.clone(),
            vector: vector.clone(),
        };
        match entries.iter_mut().find(|e| e.item.content_id == item.content_id) {
            Some(existing) => {
                debug!(content_id = %item.content_id, "replacing stored item");
                *existing = entry;
            }
            None => {
                debug!(content_id = %item.content_id, modality = %item.modality, "storing item");
                entries.push(entry);
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: &EmbeddingVector,
        modality_filter: Option<Modality>,
        threshold: f32,
        _max_results: usize,
    ) -> Result<Vec<SimilarityCandidate>, StoreError> {
        let entries = self.entries.read().await;
        let candidates: Vec<SimilarityCandidate> = entries
            .iter()
            .filter(|e| modality_filter.map_or(true, |m| e.item.modality == m))
            .filter(|e| vector.dot(&e.vector) >= threshold)
            .map(|e| SimilarityCandidate {
                content_id: e.item.content_id.clone(),
                modality: e.item.modality,
                content: e.item.payload.as_str().to_string(),
                metadata: e.item.metadata.clone(),
                vector: e.vector.clone(),
            })
            .collect();

        debug!(
            total = entries.len(),
            matched = candidates.len(),
            threshold = %threshold,
            "queried memory store"
        );
        Ok(candidates)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.entries.read().await.len() as u64)
    }

    async fn is_ready(&self) -> bool {
        true
    }
}
