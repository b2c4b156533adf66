//! The per-request orchestrator.
//!
//! A [`Pipeline`] owns no mutable state of its own: the embedder and store
//! are injected behind `Arc<dyn _>` and every request runs independently,
//! moving through the state machine
//! `received → detected → extracted → embedded → normalized →
//! (stored | ranked) → completed`. A failure at any stage transitions the
//! request to `failed` and returns the originating typed error.

use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, info, warn};
use vectra_core::{
    ContentItem, ContentStore, Embedder, EmbeddingVector, Error, Modality, Payload, RankedResult,
    RequestState, Result, StoreStats,
};
use vectra_extract::Dispatcher;

use crate::PipelineConfig;

/// Ingestion and search orchestrator.
pub struct Pipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn ContentStore>,
    dispatcher: Dispatcher,
    config: PipelineConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn ContentStore>,
        config: PipelineConfig,
    ) -> Self {
        let dispatcher = Dispatcher::new(config.size_limits);
        Self {
            embedder,
            store,
            dispatcher,
            config,
        }
    }

    /// Ingest one content item: embed, normalize, store.
    ///
    /// Returns the stored unit-norm vector. Storing an existing `content_id`
    /// replaces the previous entry.
    pub async fn ingest(&self, item: &ContentItem) -> Result<EmbeddingVector> {
        debug!(content_id = %item.content_id, state = %RequestState::Received, "ingest");

        if item.content_id.trim().is_empty() {
            return Err(Error::InvalidRequest("content_id must not be empty".into()));
        }
        if item.payload.is_empty() {
            return Err(Error::InvalidRequest("payload must not be empty".into()));
        }
        if item.payload.modality() != item.modality {
            return Err(Error::InvalidRequest(format!(
                "payload kind does not match modality {}",
                item.modality
            )));
        }

        let vector = match self.embed_normalized(&item.payload).await {
            Ok(v) => v,
            Err(e) => {
                warn!(content_id = %item.content_id, state = %RequestState::Failed, error = %e, "ingest failed");
                return Err(e);
            }
        };
        debug!(content_id = %item.content_id, state = %RequestState::Normalized, "ingest");

        let put = timeout(self.config.store_timeout, self.store.put(item, &vector))
            .await
            .map_err(|_| Error::UpstreamTimeout("store put"))?;
        if let Err(e) = put {
            warn!(content_id = %item.content_id, state = %RequestState::Failed, error = %e, "ingest failed");
            return Err(e.into());
        }
        debug!(content_id = %item.content_id, state = %RequestState::Stored, "ingest");

        info!(content_id = %item.content_id, modality = %item.modality, state = %RequestState::Completed, "ingested");
        Ok(vector)
    }

    /// Ingest a file: detect, extract, then [`Pipeline::ingest`].
    ///
    /// Returns the extracted [`ContentItem`] with its generated `content_id`
    /// and provenance metadata.
    pub async fn ingest_file(&self, filename: &str, bytes: Vec<u8>) -> Result<ContentItem> {
        debug!(filename, state = %RequestState::Received, "ingest file");
        let item = self.dispatcher.extract_file(filename, bytes).await?;
        debug!(
            content_id = %item.content_id,
            modality = %item.modality,
            state = %RequestState::Extracted,
            "ingest file"
        );

        self.ingest(&item).await?;
        Ok(item)
    }

    /// Search stored content by semantic similarity to a query payload.
    ///
    /// `threshold` and `max_results` fall back to the configured defaults
    /// when unset. Results come back best-first, capped at `max_results`,
    /// with every similarity at or above `threshold`.
    pub async fn search(
        &self,
        query: &Payload,
        modality_filter: Option<Modality>,
        threshold: Option<f32>,
        max_results: Option<usize>,
    ) -> Result<Vec<RankedResult>> {
        let threshold = threshold.unwrap_or(self.config.default_threshold);
        let max_results = max_results.unwrap_or(self.config.default_max_results);

        if query.is_empty() {
            return Err(Error::InvalidRequest("query must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidRequest(format!(
                "threshold must be within [0, 1], got {threshold}"
            )));
        }
        if max_results == 0 {
            return Err(Error::InvalidRequest(
                "max_results must be at least 1".into(),
            ));
        }

        debug!(state = %RequestState::Received, threshold = %threshold, max_results, "search");
        let vector = self.embed_normalized(query).await?;
        debug!(state = %RequestState::Normalized, "search");

        let candidates = timeout(
            self.config.store_timeout,
            self.store
                .query(&vector, modality_filter, threshold, max_results),
        )
        .await
        .map_err(|_| Error::UpstreamTimeout("store query"))??;

        let results = vectra_rank::rank(&vector, candidates, modality_filter, threshold, max_results);
        info!(
            results = results.len(),
            state = %RequestState::Completed,
            "search"
        );
        Ok(results)
    }

    /// Whether both collaborators are ready to serve.
    pub async fn ready(&self) -> bool {
        self.embedder.is_ready() && self.store.is_ready().await
    }

    /// Store-level statistics.
    pub async fn stats(&self) -> Result<StoreStats> {
        let total_items = timeout(self.config.store_timeout, self.store.count())
            .await
            .map_err(|_| Error::UpstreamTimeout("store count"))??;
        Ok(StoreStats { total_items })
    }

    /// Embedding model identifier.
    #[must_use]
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Embed a payload and normalize the raw output.
    async fn embed_normalized(&self, payload: &Payload) -> Result<EmbeddingVector> {
        if !self.embedder.is_ready() {
            return Err(vectra_core::EmbedError::NotReady.into());
        }

        let raw = timeout(self.config.embed_timeout, self.embedder.embed(payload))
            .await
            .map_err(|_| Error::UpstreamTimeout("embed"))??;
        debug!(state = %RequestState::Embedded, dimension = raw.len(), "embedded payload");

        let vector = vectra_embed::normalize(&raw, self.config.dimension)?;
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use vectra_core::{EmbedError, Metadata};
    use vectra_embed::HashEmbedder;
    use vectra_store::MemoryStore;

    fn pipeline_with_dim(dimension: usize) -> Pipeline {
        let config = PipelineConfig {
            dimension,
            ..PipelineConfig::default()
        };
        Pipeline::new(
            Arc::new(HashEmbedder::new(dimension)),
            Arc::new(MemoryStore::new()),
            config,
        )
    }

    fn text_item(id: &str, text: &str) -> ContentItem {
        ContentItem {
            content_id: id.to_string(),
            modality: Modality::Text,
            payload: Payload::Text(text.to_string()),
            metadata: Metadata::new(),
        }
    }

    #[tokio::test]
    async fn test_ingest_returns_unit_vector() {
        let pipeline = pipeline_with_dim(64);
        let vector = pipeline.ingest(&text_item("a", "hello")).await.unwrap();
        assert_eq!(vector.dimension(), 64);
        let norm_sq: f64 = vector
            .values()
            .iter()
            .map(|&v| f64::from(v) * f64::from(v))
            .sum();
        assert!((norm_sq.sqrt() - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_ingest_rejects_empty_payload() {
        let pipeline = pipeline_with_dim(64);
        let result = pipeline.ingest(&text_item("a", "")).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_ingest_rejects_empty_content_id() {
        let pipeline = pipeline_with_dim(64);
        let result = pipeline.ingest(&text_item("  ", "hello")).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_ingest_rejects_modality_mismatch() {
        let pipeline = pipeline_with_dim(64);
        let item = ContentItem {
            content_id: "x".to_string(),
            modality: Modality::Image,
            payload: Payload::Text("not an image".to_string()),
            metadata: Metadata::new(),
        };
        let result = pipeline.ingest(&item).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_search_finds_exact_content() {
        let pipeline = pipeline_with_dim(64);
        pipeline.ingest(&text_item("a", "red summer dress")).await.unwrap();
        pipeline.ingest(&text_item("b", "blue winter coat")).await.unwrap();

        let results = pipeline
            .search(
                &Payload::Text("red summer dress".to_string()),
                None,
                Some(0.99),
                None,
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content_id, "a");
        assert!((results[0].similarity - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_search_validates_threshold() {
        let pipeline = pipeline_with_dim(64);
        let query = Payload::Text("q".to_string());
        let result = pipeline.search(&query, None, Some(1.5), None).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
        let result = pipeline.search(&query, None, Some(-0.1), None).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_search_validates_max_results() {
        let pipeline = pipeline_with_dim(64);
        let query = Payload::Text("q".to_string());
        let result = pipeline.search(&query, None, None, Some(0)).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let pipeline = pipeline_with_dim(64);
        let result = pipeline
            .search(&Payload::Text(String::new()), None, None, None)
            .await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_counts_ingested_items() {
        let pipeline = pipeline_with_dim(64);
        pipeline.ingest(&text_item("a", "one")).await.unwrap();
        pipeline.ingest(&text_item("b", "two")).await.unwrap();
        pipeline.ingest(&text_item("a", "one again")).await.unwrap();
        assert_eq!(pipeline.stats().await.unwrap().total_items, 2);
    }

    #[tokio::test]
    async fn test_ready_with_healthy_collaborators() {
        let pipeline = pipeline_with_dim(64);
        assert!(pipeline.ready().await);
    }

    // Embedder that returns the wrong dimension.
    struct WrongDimEmbedder;

    #[async_trait]
    impl Embedder for WrongDimEmbedder {
        fn model_name(&self) -> &str {
            "wrong-dim"
        }
        fn dimension(&self) -> usize {
            8
        }
        fn modalities(&self) -> &[Modality] {
            &[Modality::Text]
        }
        fn is_ready(&self) -> bool {
            true
        }
        async fn embed(&self, _payload: &Payload) -> std::result::Result<Vec<f32>, EmbedError> {
            Ok(vec![1.0; 4])
        }
    }

    #[tokio::test]
    async fn test_ingest_surfaces_dimension_mismatch() {
        let pipeline = Pipeline::new(
            Arc::new(WrongDimEmbedder),
            Arc::new(MemoryStore::new()),
            PipelineConfig {
                dimension: 8,
                ..PipelineConfig::default()
            },
        );
        let result = pipeline.ingest(&text_item("a", "hello")).await;
        assert!(matches!(result, Err(Error::Vector(_))));
        // nothing reaches the store on a failed request
        assert_eq!(pipeline.stats().await.unwrap().total_items, 0);
    }

    // Embedder that never answers.
    struct StalledEmbedder;

    #[async_trait]
    impl Embedder for StalledEmbedder {
        fn model_name(&self) -> &str {
            "stalled"
        }
        fn dimension(&self) -> usize {
            8
        }
        fn modalities(&self) -> &[Modality] {
            &[Modality::Text]
        }
        fn is_ready(&self) -> bool {
            true
        }
        async fn embed(&self, _payload: &Payload) -> std::result::Result<Vec<f32>, EmbedError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(vec![1.0; 8])
        }
    }

    #[tokio::test]
    async fn test_ingest_times_out_on_stalled_embedder() {
        let pipeline = Pipeline::new(
            Arc::new(StalledEmbedder),
            Arc::new(MemoryStore::new()),
            PipelineConfig {
                dimension: 8,
                embed_timeout: Duration::from_millis(50),
                ..PipelineConfig::default()
            },
        );
        let result = pipeline.ingest(&text_item("a", "hello")).await;
        assert!(matches!(result, Err(Error::UpstreamTimeout("embed"))));
    }

    // Embedder that reports itself unready.
    struct UnreadyEmbedder;

    #[async_trait]
    impl Embedder for UnreadyEmbedder {
        fn model_name(&self) -> &str {
            "unready"
        }
        fn dimension(&self) -> usize {
            8
        }
        fn modalities(&self) -> &[Modality] {
            &[Modality::Text]
        }
        fn is_ready(&self) -> bool {
            false
        }
        async fn embed(&self, _payload: &Payload) -> std::result::Result<Vec<f32>, EmbedError> {
            Err(EmbedError::NotReady)
        }
    }

    #[tokio::test]
    async fn test_unready_embedder_fails_fast() {
        let pipeline = Pipeline::new(
            Arc::new(UnreadyEmbedder),
            Arc::new(MemoryStore::new()),
            PipelineConfig {
                dimension: 8,
                ..PipelineConfig::default()
            },
        );
        assert!(!pipeline.ready().await);
        let result = pipeline.ingest(&text_item("a", "hello")).await;
        assert!(matches!(
            result,
            Err(Error::Embedding(EmbedError::NotReady))
        ));
    }

    #[tokio::test]
    async fn test_ingest_file_text() {
        let pipeline = pipeline_with_dim(64);
        let item = pipeline
            .ingest_file("note.txt", b"groceries: milk, eggs".to_vec())
            .await
            .unwrap();
        assert_eq!(item.modality, Modality::Text);
        assert_eq!(item.metadata["filename"], "note.txt");
        assert_eq!(pipeline.stats().await.unwrap().total_items, 1);
    }

    #[tokio::test]
    async fn test_ingest_file_failure_stores_nothing() {
        let pipeline = pipeline_with_dim(64);
        let result = pipeline
            .ingest_file("broken.pdf", b"not a real pdf".to_vec())
            .await;
        assert!(matches!(result, Err(Error::Extraction(_))));
        assert_eq!(pipeline.stats().await.unwrap().total_items, 0);
    }
}
