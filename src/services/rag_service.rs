//! RAG service for meeting transcripts
//!
//! The explicit context object tying the pipeline together:
//! - Write path: segments -> chunker -> embedder -> index
//! - Read path: question -> embedder -> index -> retrieval policy -> answerer
//!
//! Several instances may coexist; nothing here is global.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::answerer::{no_evidence_result, Answerer};
use super::embedding_service::Embedder;
use super::retriever::rank_evidence;
use crate::adapters::embeddings::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};
use crate::adapters::generation::{OpenAiChatConfig, OpenAiChatProvider};
use crate::domain::errors::{DomainError, DomainResult, ProviderResult};
use crate::domain::models::{
    Config, EmbeddingRecord, EvidenceItem, IndexingReport, RagConfig, RagConfigUpdate, RagResult,
    Segment, SharedCredential,
};
use crate::domain::ports::{
    EmbeddingProvider, GenerationProvider, NearestNeighborIndex, NullEmbeddingProvider,
    NullGenerationProvider,
};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::vector::{Chunker, VectorStore};

/// Retrieval-augmented answering over indexed meeting utterances
pub struct RagService {
    embedder: Embedder,
    answerer: Answerer,
    chunker: Chunker,
    index: RwLock<Box<dyn NearestNeighborIndex>>,
    rag_config: RwLock<RagConfig>,
    credential: SharedCredential,
    min_chunk_chars: usize,
    embed_delay: Duration,
}

impl RagService {
    /// Build a service backed by the OpenAI-compatible adapters.
    ///
    /// The key comes from `provider.api_key` or `OPENAI_API_KEY`; without one
    /// the service runs on its local fallbacks until [`Self::set_credential`].
    pub fn from_config(config: &Config) -> ProviderResult<Self> {
        let credential = SharedCredential::new(config.provider.resolve_api_key());

        let embedding = OpenAiEmbeddingProvider::new(
            OpenAiEmbeddingConfig::from_provider(&config.provider, config.store.dimension),
            credential.clone(),
        )?;
        let generation = OpenAiChatProvider::new(
            OpenAiChatConfig::from_provider(&config.provider),
            credential.clone(),
        )?;

        Ok(Self::with_providers(
            config,
            credential,
            Arc::new(embedding),
            Arc::new(generation),
        ))
    }

    /// Build a service that never calls a remote provider.
    pub fn offline(config: &Config) -> Self {
        Self::with_providers(
            config,
            SharedCredential::default(),
            Arc::new(NullEmbeddingProvider::new()),
            Arc::new(NullGenerationProvider::new()),
        )
    }

    /// Build a service from explicit providers and an in-memory index.
    pub fn with_providers(
        config: &Config,
        credential: SharedCredential,
        embedding: Arc<dyn EmbeddingProvider>,
        generation: Arc<dyn GenerationProvider>,
    ) -> Self {
        let timeout = Duration::from_secs(config.provider.timeout_secs);
        let dimension = config.store.dimension;

        Self {
            embedder: Embedder::new(embedding, dimension, timeout),
            answerer: Answerer::new(generation, timeout),
            chunker: Chunker::new(config.store.chunk_max_length),
            index: RwLock::new(Box::new(VectorStore::new(dimension))),
            rag_config: RwLock::new(config.rag.clone()),
            credential,
            min_chunk_chars: config.store.min_chunk_chars,
            embed_delay: Duration::from_millis(config.provider.embed_delay_ms),
        }
    }

    /// Chunk, embed and store every segment of a meeting.
    ///
    /// Records are appended one at a time, so a concurrent query may see a
    /// partially indexed batch. Re-adding a meeting appends duplicates.
    pub async fn add_segments(&self, meeting_id: &str, segments: &[Segment]) -> IndexingReport {
        let mut report = IndexingReport {
            segments: segments.len(),
            ..Default::default()
        };
        let mut remote_calls = 0usize;

        for segment in segments {
            let chunks = self.chunker.chunk(&segment.text);
            let multi_chunk = chunks.len() > 1;

            for (chunk_index, chunk) in chunks.into_iter().enumerate() {
                if chunk.trim().chars().count() < self.min_chunk_chars {
                    debug!(
                        meeting_id,
                        segment = segment.index,
                        chunk_index,
                        "skipping short chunk"
                    );
                    report.chunks_skipped += 1;
                    continue;
                }

                if self.embedder.is_remote_configured() {
                    if remote_calls > 0 && !self.embed_delay.is_zero() {
                        tokio::time::sleep(self.embed_delay).await;
                    }
                    remote_calls += 1;
                }

                let vector = self.embedder.embed(&chunk).await;
                let record = EmbeddingRecord {
                    vector,
                    segment_id: EmbeddingRecord::segment_id_for(meeting_id, segment.index),
                    meeting_id: meeting_id.to_string(),
                    speaker: segment.speaker.clone(),
                    timestamp_seconds: segment.offset_seconds,
                    text: chunk,
                    chunk_index: multi_chunk.then_some(chunk_index),
                };

                let segment_id = record.segment_id.clone();
                if let Err(err) = self.index.write().await.insert(record) {
                    warn!(
                        meeting_id,
                        segment_id = %segment_id,
                        error = %err,
                        "failed to store chunk"
                    );
                    report.chunks_failed += 1;
                } else {
                    report.chunks_indexed += 1;
                }
            }
        }

        info!(
            meeting_id,
            segments = report.segments,
            indexed = report.chunks_indexed,
            skipped = report.chunks_skipped,
            failed = report.chunks_failed,
            "indexed meeting segments"
        );

        report
    }

    /// Ranked evidence for `question` under the current retrieval policy.
    pub async fn retrieve(
        &self,
        question: &str,
        current_meeting_id: Option<&str>,
    ) -> Vec<EvidenceItem> {
        let (limit, threshold) = {
            let config = self.rag_config.read().await;
            (config.retrieval_limit, config.similarity_threshold)
        };

        let query_vector = self.embedder.embed(question).await;
        let candidates = self.index.read().await.query(&query_vector, limit);
        let candidate_count = candidates.len();
        let evidence = rank_evidence(candidates, threshold, current_meeting_id);

        debug!(
            candidates = candidate_count,
            kept = evidence.len(),
            threshold,
            current_meeting_id,
            "retrieved evidence"
        );

        evidence
    }

    /// Answer a question about the indexed meetings.
    pub async fn query(&self, question: &str, current_meeting_id: Option<&str>) -> RagResult {
        let evidence = self.retrieve(question, current_meeting_id).await;
        if evidence.is_empty() {
            return no_evidence_result();
        }

        let config = self.rag_config.read().await.clone();
        self.answerer
            .answer(question, &evidence, current_meeting_id, &config)
            .await
    }

    pub async fn vector_count(&self) -> usize {
        self.index.read().await.count()
    }

    /// True when a credential is present and at least one remote provider
    /// will be tried.
    pub fn is_configured(&self) -> bool {
        self.credential.is_present()
            && (self.embedder.is_remote_configured() || self.answerer.is_remote_configured())
    }

    /// Replace the provider credential. An empty key switches both providers
    /// back to the local fallbacks.
    pub fn set_credential(&self, key: impl Into<String>) {
        let key = key.into();
        self.credential.set(Some(key));
        info!(configured = self.credential.is_present(), "provider credential updated");
    }

    /// Merge a partial config update. Unspecified fields keep their value.
    ///
    /// The merged config is validated first; on error nothing changes.
    pub async fn update_config(&self, update: &RagConfigUpdate) -> DomainResult<()> {
        let mut config = self.rag_config.write().await;
        let mut merged = config.clone();
        merged.apply(update);
        ConfigLoader::validate_rag(&merged)
            .map_err(|e| DomainError::ValidationFailed(e.to_string()))?;

        *config = merged;
        debug!(?config, "rag config updated");
        Ok(())
    }

    pub async fn rag_config(&self) -> RagConfig {
        self.rag_config.read().await.clone()
    }

    pub async fn export(&self) -> Vec<EmbeddingRecord> {
        self.index.read().await.export()
    }

    /// Replace the store contents. Rejected as a whole if any record has the
    /// wrong dimension.
    pub async fn import(&self, records: Vec<EmbeddingRecord>) -> DomainResult<()> {
        let count = records.len();
        self.index.write().await.import(records)?;
        info!(records = count, "imported vector store snapshot");
        Ok(())
    }

    pub async fn records_for_meeting(&self, meeting_id: &str) -> Vec<EmbeddingRecord> {
        self.index.read().await.records_for_meeting(meeting_id)
    }

    /// `(meeting_id, record_count)` pairs, largest first.
    pub async fn meeting_stats(&self) -> Vec<(String, usize)> {
        self.index.read().await.meeting_stats()
    }

    pub async fn clear(&self) {
        self.index.write().await.clear();
        info!("vector store cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> RagService {
        RagService::offline(&Config::default())
    }

    #[tokio::test]
    async fn test_empty_store_has_no_evidence() {
        let service = service();
        assert_eq!(service.vector_count().await, 0);
        assert!(service.retrieve("anything", None).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_segments_skips_short_chunks() {
        let service = service();
        let segments = vec![
            Segment::new(0, 0.0, "A", "ok"),
            Segment::new(1, 3.5, "B", "We agreed to ship the beta next Friday."),
        ];

        let report = service.add_segments("m1", &segments).await;
        assert_eq!(report.segments, 2);
        assert_eq!(report.chunks_indexed, 1);
        assert_eq!(report.chunks_skipped, 1);
        assert_eq!(service.vector_count().await, 1);

        let records = service.records_for_meeting("m1").await;
        assert_eq!(records[0].segment_id, "m1_1");
        assert_eq!(records[0].speaker, "B");
        assert!((records[0].timestamp_seconds - 3.5).abs() < f64::EPSILON);
        assert_eq!(records[0].chunk_index, None);
    }

    #[tokio::test]
    async fn test_multi_chunk_segments_get_chunk_index() {
        let mut config = Config::default();
        config.store.chunk_max_length = 40;
        let service = RagService::offline(&config);

        let text = "The first sentence is about budgets. The second sentence covers hiring plans.";
        service.add_segments("m1", &[Segment::new(0, 0.0, "A", text)]).await;

        let records = service.records_for_meeting("m1").await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].chunk_index, Some(0));
        assert_eq!(records[1].chunk_index, Some(1));
        assert!(records.iter().all(|r| r.segment_id == "m1_0"));
    }

    #[tokio::test]
    async fn test_update_config_is_partial() {
        let service = service();
        service
            .update_config(&RagConfigUpdate {
                similarity_threshold: Some(0.3),
                ..Default::default()
            })
            .await
            .unwrap();

        let config = service.rag_config().await;
        assert!((config.similarity_threshold - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.retrieval_limit, 6);
    }

    #[tokio::test]
    async fn test_update_config_rejects_invalid_values() {
        let service = service();
        let invalid = [
            RagConfigUpdate {
                retrieval_limit: Some(0),
                ..Default::default()
            },
            RagConfigUpdate {
                similarity_threshold: Some(1.5),
                ..Default::default()
            },
            RagConfigUpdate {
                max_context_length: Some(0),
                similarity_threshold: Some(0.2),
                ..Default::default()
            },
        ];

        for update in &invalid {
            let err = service.update_config(update).await.unwrap_err();
            assert!(matches!(err, DomainError::ValidationFailed(_)));
        }

        // Rejected updates leave every field untouched
        assert_eq!(service.rag_config().await, RagConfig::default());
    }

    #[tokio::test]
    async fn test_set_credential_toggles_configured() {
        let service = RagService::from_config(&Config::default()).unwrap();
        service.set_credential("");
        assert!(!service.is_configured());

        service.set_credential("sk-test");
        assert!(service.is_configured());

        service.set_credential("   ");
        assert!(!service.is_configured());
    }

    #[tokio::test]
    async fn test_offline_is_never_configured() {
        let service = service();
        service.set_credential("sk-test");
        assert!(!service.is_configured());
    }

    #[tokio::test]
    async fn test_clear_and_stats() {
        let service = service();
        service
            .add_segments("m1", &[Segment::new(0, 0.0, "A", "Budget review for the next quarter")])
            .await;
        service
            .add_segments("m2", &[Segment::new(0, 0.0, "B", "Hiring plan for the platform team")])
            .await;

        assert_eq!(
            service.meeting_stats().await,
            vec![("m1".to_string(), 1), ("m2".to_string(), 1)]
        );

        service.clear().await;
        assert_eq!(service.vector_count().await, 0);
    }
}
