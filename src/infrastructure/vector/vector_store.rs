//! In-memory vector store
//!
//! Holds embedded records in insertion order and answers similarity queries
//! with a linear cosine scan. Sized for a few thousand records; larger
//! corpora should swap in another [`NearestNeighborIndex`].

use std::collections::HashMap;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EmbeddingRecord, EvidenceItem};
use crate::domain::ports::NearestNeighborIndex;

/// Default vector dimensionality
pub const DEFAULT_DIMENSION: usize = 384;

/// Linear-scan vector store
#[derive(Debug, Clone)]
pub struct VectorStore {
    dimension: usize,
    records: Vec<EmbeddingRecord>,
}

impl Default for VectorStore {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl VectorStore {
    /// Create an empty store whose records must all be `dimension` long
    pub const fn new(dimension: usize) -> Self {
        Self {
            dimension,
            records: Vec::new(),
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> DomainResult<()> {
        if vector.len() == self.dimension {
            Ok(())
        } else {
            Err(DomainError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            })
        }
    }
}

/// Cosine similarity of two vectors.
///
/// Returns 0 when either norm is 0 or when the lengths differ, so a
/// mismatched query degrades ranking instead of failing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let x64 = f64::from(x);
        let y64 = f64::from(y);
        dot += x64 * y64;
        norm_a += x64 * x64;
        norm_b += y64 * y64;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
}

impl NearestNeighborIndex for VectorStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn insert(&mut self, record: EmbeddingRecord) -> DomainResult<()> {
        self.check_dimension(&record.vector)?;
        self.records.push(record);
        Ok(())
    }

    fn query(&self, query_vector: &[f32], limit: usize) -> Vec<EvidenceItem> {
        if self.records.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| (i, cosine_similarity(query_vector, &record.vector)))
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(i, similarity)| EvidenceItem::new(self.records[i].clone(), similarity))
            .collect()
    }

    fn count(&self) -> usize {
        self.records.len()
    }

    fn clear(&mut self) {
        self.records.clear();
    }

    fn records_for_meeting(&self, meeting_id: &str) -> Vec<EmbeddingRecord> {
        self.records
            .iter()
            .filter(|r| r.meeting_id == meeting_id)
            .cloned()
            .collect()
    }

    fn export(&self) -> Vec<EmbeddingRecord> {
        self.records.clone()
    }

    fn import(&mut self, records: Vec<EmbeddingRecord>) -> DomainResult<()> {
        for record in &records {
            self.check_dimension(&record.vector)?;
        }
        self.records = records;
        Ok(())
    }

    fn meeting_stats(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &self.records {
            *counts.entry(record.meeting_id.as_str()).or_default() += 1;
        }

        let mut stats: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(id, count)| (id.to_string(), count))
            .collect();
        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn vector_strategy(dim: usize) -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-1.0f32..1.0f32, dim..=dim)
    }

    proptest! {
        /// cosine(a, b) == cosine(b, a)
        #[test]
        fn proptest_cosine_symmetry(a in vector_strategy(32), b in vector_strategy(32)) {
            prop_assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-6);
        }

        /// cosine(v, v) == 1 for non-zero v
        #[test]
        fn proptest_cosine_self_is_one(v in vector_strategy(32)) {
            prop_assume!(v.iter().any(|x| x.abs() > 1e-3));
            prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
        }

        /// Query results come back in non-increasing similarity order
        #[test]
        fn proptest_query_ordering(
            vectors in prop::collection::vec(vector_strategy(8), 0..40),
            query in vector_strategy(8),
            limit in 0usize..50,
        ) {
            let mut store = VectorStore::new(8);
            for (i, v) in vectors.iter().enumerate() {
                store.insert(EmbeddingRecord {
                    vector: v.clone(),
                    segment_id: format!("m_{i}"),
                    meeting_id: "m".to_string(),
                    speaker: "A".to_string(),
                    timestamp_seconds: 0.0,
                    text: String::new(),
                    chunk_index: None,
                }).unwrap();
            }

            let results = store.query(&query, limit);
            prop_assert_eq!(results.len(), limit.min(vectors.len()));
            for pair in results.windows(2) {
                prop_assert!(pair[0].similarity >= pair[1].similarity);
            }
        }
    }
}
