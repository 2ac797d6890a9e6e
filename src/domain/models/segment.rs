//! Meeting segment, stored record and retrieval result models.

use serde::{Deserialize, Serialize};

/// One speaker utterance produced by the upstream transcript parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Segment {
    /// Position of the utterance within its meeting
    pub index: usize,

    /// Start offset from the beginning of the meeting, in seconds
    #[serde(alias = "offsetSeconds")]
    pub offset_seconds: f64,

    /// Speaker label as emitted by the transcript
    pub speaker: String,

    /// Utterance text
    pub text: String,
}

impl Segment {
    pub fn new(
        index: usize,
        offset_seconds: f64,
        speaker: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            index,
            offset_seconds,
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// A single embedded chunk held by the vector store.
///
/// Several records share a `segment_id` when the segment was split into
/// chunks; `chunk_index` tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingRecord {
    pub vector: Vec<f32>,
    pub segment_id: String,
    pub meeting_id: String,
    pub speaker: String,
    pub timestamp_seconds: f64,
    pub text: String,
    #[serde(default)]
    pub chunk_index: Option<usize>,
}

impl EmbeddingRecord {
    /// Build the stable segment id `"{meeting_id}_{segment_index}"`.
    pub fn segment_id_for(meeting_id: &str, segment_index: usize) -> String {
        format!("{meeting_id}_{segment_index}")
    }
}

/// A retrieved record together with its similarity to the question.
///
/// After current-meeting boosting `similarity` is a ranking key and may
/// exceed 1.0. It is never a calibrated probability.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceItem {
    pub record: EmbeddingRecord,
    pub similarity: f32,
}

impl EvidenceItem {
    pub const fn new(record: EmbeddingRecord, similarity: f32) -> Self {
        Self { record, similarity }
    }
}

/// Source citation returned to callers, projected from an [`EvidenceItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SourceRef {
    pub segment_id: String,
    pub meeting_id: String,
    pub speaker: String,
    pub timestamp_seconds: f64,
    pub text: String,
    /// Ranking score, see [`EvidenceItem::similarity`]
    pub similarity: f32,
}

impl From<&EvidenceItem> for SourceRef {
    fn from(item: &EvidenceItem) -> Self {
        Self {
            segment_id: item.record.segment_id.clone(),
            meeting_id: item.record.meeting_id.clone(),
            speaker: item.record.speaker.clone(),
            timestamp_seconds: item.record.timestamp_seconds,
            text: item.record.text.clone(),
            similarity: item.similarity,
        }
    }
}

/// Which path produced the answer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    /// Remote generation provider answered
    Generated,
    /// Local extractive answer (no provider, or the provider failed)
    Extractive,
    /// Nothing passed the retrieval policy
    NoEvidence,
}

impl std::fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generated => write!(f, "generated"),
            Self::Extractive => write!(f, "extractive"),
            Self::NoEvidence => write!(f, "no_evidence"),
        }
    }
}

/// Response to a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RagResult {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub used_context_text: String,
    /// Clamped to `[0.0, 1.0]`
    pub confidence: f32,
    /// True when evidence lines were dropped to respect `max_context_length`
    pub context_truncated: bool,
    pub mode: AnswerMode,
}

/// Summary of one `add_segments` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingReport {
    /// Segments received
    pub segments: usize,
    /// Records appended to the store
    pub chunks_indexed: usize,
    /// Chunks dropped for being shorter than the minimum length
    pub chunks_skipped: usize,
    /// Chunks whose record could not be stored
    pub chunks_failed: usize,
}
