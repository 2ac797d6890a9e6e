//! Domain models for the meeting retrieval pipeline.

pub mod config;
pub mod credential;
pub mod segment;

pub use config::{Config, LoggingConfig, ProviderConfig, RagConfig, RagConfigUpdate, StoreConfig};
pub use credential::SharedCredential;
pub use segment::{
    AnswerMode, EmbeddingRecord, EvidenceItem, IndexingReport, RagResult, Segment, SourceRef,
};
