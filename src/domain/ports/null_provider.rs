//! Null provider implementations.
//!
//! Used when no remote backend should ever be called (offline mode, tests).
//! They report themselves as unconfigured, so the pipeline goes straight to
//! its local fallbacks.

use async_trait::async_trait;

use super::embedding::EmbeddingProvider;
use super::generation::{GenerationProvider, GenerationRequest};
use crate::domain::errors::{ProviderError, ProviderResult};

/// An embedding provider that is never configured.
#[derive(Debug, Clone, Default)]
pub struct NullEmbeddingProvider;

impl NullEmbeddingProvider {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    fn name(&self) -> &'static str {
        "null"
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn embed(&self, _text: &str) -> ProviderResult<Vec<f32>> {
        Err(ProviderError::MissingCredential)
    }
}

/// A generation provider that is never configured.
#[derive(Debug, Clone, Default)]
pub struct NullGenerationProvider;

impl NullGenerationProvider {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationProvider for NullGenerationProvider {
    fn name(&self) -> &'static str {
        "null"
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn generate(&self, _request: &GenerationRequest) -> ProviderResult<String> {
        Err(ProviderError::MissingCredential)
    }
}
