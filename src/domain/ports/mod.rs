//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that adapters implement:
//! - EmbeddingProvider: remote text embedding
//! - GenerationProvider: remote answer generation
//! - NearestNeighborIndex: vector storage and similarity search
//!
//! These traits keep the retrieval pipeline independent of any specific
//! backend.

pub mod embedding;
pub mod generation;
pub mod nearest_neighbor;
pub mod null_provider;

pub use embedding::EmbeddingProvider;
pub use generation::{GenerationProvider, GenerationRequest};
pub use nearest_neighbor::NearestNeighborIndex;
pub use null_provider::{NullEmbeddingProvider, NullGenerationProvider};
