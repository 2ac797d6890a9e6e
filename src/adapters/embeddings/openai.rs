//! OpenAI embedding provider adapter.
//!
//! Calls the `/embeddings` endpoint of the OpenAI API or any compatible
//! server (Azure OpenAI, local inference servers). The credential is read
//! from a [`SharedCredential`] on every call so it can change at runtime.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::models::{ProviderConfig, SharedCredential};
use crate::domain::ports::EmbeddingProvider;

/// Configuration for the OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    /// Base URL for the API. Default: `https://api.openai.com/v1`.
    pub base_url: String,
    /// Embedding model. Default: `text-embedding-3-small`.
    pub model: String,
    /// Requested output dimension, sent as `dimensions` when set.
    pub dimensions: Option<usize>,
    /// Request timeout in seconds. Default: 30.
    pub timeout_secs: u64,
}

impl Default for OpenAiEmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: Some(384),
            timeout_secs: 30,
        }
    }
}

impl OpenAiEmbeddingConfig {
    /// Build from the provider section of the application config.
    pub fn from_provider(provider: &ProviderConfig, dimensions: usize) -> Self {
        Self {
            base_url: provider.base_url.clone(),
            model: provider.embedding_model.clone(),
            dimensions: Some(dimensions),
            timeout_secs: provider.timeout_secs,
        }
    }
}

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    config: OpenAiEmbeddingConfig,
    credential: SharedCredential,
    client: reqwest::Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(
        config: OpenAiEmbeddingConfig,
        credential: SharedCredential,
    ) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            credential,
            client,
        })
    }

    async fn call_embeddings_api(&self, text: &str) -> ProviderResult<Vec<f32>> {
        let api_key = self.credential.get().ok_or(ProviderError::MissingCredential)?;
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));

        let request_body = EmbeddingsRequest {
            model: &self.config.model,
            input: vec![text],
            dimensions: self.config.dimensions,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(ProviderError::Http { status, body });
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| {
                ProviderError::InvalidResponse(format!("Failed to parse embedding response: {e}"))
            })?;

        result
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| ProviderError::InvalidResponse("Empty embedding response".to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        self.credential.is_present()
    }

    async fn embed(&self, text: &str) -> ProviderResult<Vec<f32>> {
        self.call_embeddings_api(text).await
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
