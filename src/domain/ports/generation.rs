//! Generation provider port.
//!
//! A generation backend turns a system prompt plus a user prompt into answer
//! text. Any OpenAI-compatible chat API, local model server or test double
//! can sit behind it.

use async_trait::async_trait;

use crate::domain::errors::ProviderResult;

/// Prompt pair and sampling parameters for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait for remote text generation providers.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether a credential is available.
    fn is_configured(&self) -> bool;

    /// Generate answer text for the request.
    async fn generate(&self, request: &GenerationRequest) -> ProviderResult<String>;
}
