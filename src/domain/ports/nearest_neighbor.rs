//! Nearest-neighbor index port.
//!
//! The retriever only talks to this trait, so the linear-scan store can be
//! replaced by an approximate index without touching retrieval policy.

use crate::domain::errors::DomainResult;
use crate::domain::models::{EmbeddingRecord, EvidenceItem};

/// Storage and similarity search over embedded records.
pub trait NearestNeighborIndex: Send + Sync {
    /// Fixed dimensionality every stored vector must have.
    fn dimension(&self) -> usize;

    /// Append a record.
    ///
    /// # Returns
    /// * `Err(DomainError::DimensionMismatch)` - If the vector length differs from
    ///   [`Self::dimension`]
    fn insert(&mut self, record: EmbeddingRecord) -> DomainResult<()>;

    /// Top `limit` records by descending cosine similarity to `query_vector`.
    fn query(&self, query_vector: &[f32], limit: usize) -> Vec<EvidenceItem>;

    /// Number of stored records.
    fn count(&self) -> usize;

    /// Remove every record.
    fn clear(&mut self);

    /// Records belonging to one meeting, in insertion order.
    fn records_for_meeting(&self, meeting_id: &str) -> Vec<EmbeddingRecord>;

    /// All records in insertion order.
    fn export(&self) -> Vec<EmbeddingRecord>;

    /// Replace the whole store with `records`. All-or-nothing.
    fn import(&mut self, records: Vec<EmbeddingRecord>) -> DomainResult<()>;

    /// `(meeting_id, record_count)` pairs, largest meeting first.
    fn meeting_stats(&self) -> Vec<(String, usize)>;
}
