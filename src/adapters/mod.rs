//! Adapters for external provider APIs.

pub mod embeddings;
pub mod generation;
