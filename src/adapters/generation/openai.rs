//! OpenAI chat-completions generation adapter.
//!
//! Sends a system + user message pair to `/chat/completions` on the OpenAI
//! API or any compatible server and returns the first choice's text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::models::{ProviderConfig, SharedCredential};
use crate::domain::ports::{GenerationProvider, GenerationRequest};

/// Configuration for the chat-completions provider.
#[derive(Debug, Clone)]
pub struct OpenAiChatConfig {
    /// API base URL.
    pub base_url: String,
    /// Model to use.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAiChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

impl OpenAiChatConfig {
    /// Build from the provider section of the application config.
    pub fn from_provider(provider: &ProviderConfig) -> Self {
        Self {
            base_url: provider.base_url.clone(),
            model: provider.generation_model.clone(),
            timeout_secs: provider.timeout_secs,
        }
    }
}

/// Message role in the chat API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Request to the chat-completions API.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Response from the chat-completions API.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat generation provider.
pub struct OpenAiChatProvider {
    config: OpenAiChatConfig,
    credential: SharedCredential,
    client: reqwest::Client,
}

impl OpenAiChatProvider {
    pub fn new(config: OpenAiChatConfig, credential: SharedCredential) -> ProviderResult<Self> {
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
}

#[async_trait]
impl GenerationProvider for OpenAiChatProvider {
    fn name(&self) -> &'static str {
        "openai-chat"
    }

    fn is_configured(&self) -> bool {
        self.credential.is_present()
    }

    async fn generate(&self, request: &GenerationRequest) -> ProviderResult<String> {
        let api_key = self.credential.get().ok_or(ProviderError::MissingCredential)?;
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: MessageRole::System,
                    content: request.system_prompt.clone(),
                },
                ChatMessage {
                    role: MessageRole::User,
                    content: request.user_prompt.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
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

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| {
                ProviderError::InvalidResponse(format!("Failed to parse completion: {e}"))
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("Completion contained no text".to_string())
            })
    }
}
