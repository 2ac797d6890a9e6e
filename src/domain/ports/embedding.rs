//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for remote embedding backends that convert text into
//! dense vectors. Failures are returned as [`ProviderError`] so the caller
//! decides whether to fall back to the local hash embedding.
//!
//! [`ProviderError`]: crate::domain::errors::ProviderError

use async_trait::async_trait;

use crate::domain::errors::ProviderResult;

/// Trait for remote embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "openai", "null").
    fn name(&self) -> &'static str;

    /// Whether a credential is available. Unconfigured providers are
    /// skipped without being called.
    fn is_configured(&self) -> bool;

    /// Generate an embedding for already-normalized text.
    async fn embed(&self, text: &str) -> ProviderResult<Vec<f32>>;
}
