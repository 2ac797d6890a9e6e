//! Vector infrastructure components
//!
//! Provides sentence chunking, the deterministic fallback embedding and the
//! in-memory vector store used for retrieval.

pub mod chunker;
pub mod fallback_embedding;
pub mod vector_store;

pub use chunker::Chunker;
pub use fallback_embedding::FallbackEmbedder;
pub use vector_store::{cosine_similarity, VectorStore, DEFAULT_DIMENSION};
