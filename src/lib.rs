//! meeting-rag - retrieval-augmented answering over meeting transcripts
//!
//! Utterances are chunked, embedded and kept in an in-memory vector store.
//! Questions are embedded the same way, matched against the store, filtered
//! by a retrieval policy and answered either by a remote chat model or by a
//! deterministic extractive fallback.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the provider / index ports
//! - **Adapters** (`adapters`): OpenAI-compatible embedding and chat clients
//! - **Infrastructure Layer** (`infrastructure`): config, logging, vector store
//! - **Service Layer** (`services`): embedder, retrieval policy, answerer, [`RagService`]
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use meeting_rag::{Config, RagService, Segment};
//!
//! # async fn demo() {
//! let service = RagService::offline(&Config::default());
//! service
//!     .add_segments("weekly", &[Segment::new(0, 12.0, "Alice", "We ship the beta on Friday.")])
//!     .await;
//! let result = service.query("When do we ship?", Some("weekly")).await;
//! println!("{} ({:.2})", result.answer, result.confidence);
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult, ProviderError, ProviderResult};
pub use domain::models::{
    AnswerMode, Config, EmbeddingRecord, EvidenceItem, IndexingReport, RagConfig,
    RagConfigUpdate, RagResult, Segment, SharedCredential, SourceRef,
};
pub use domain::ports::{
    EmbeddingProvider, GenerationProvider, GenerationRequest, NearestNeighborIndex,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::vector::{Chunker, FallbackEmbedder, VectorStore};
pub use services::RagService;
