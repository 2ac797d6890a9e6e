use serde::{Deserialize, Serialize};

/// Main configuration structure for meeting-rag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Retrieval and answering parameters
    #[serde(default)]
    pub rag: RagConfig,

    /// Remote embedding / generation provider
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Vector store and ingestion parameters
    #[serde(default)]
    pub store: StoreConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation policy for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Retrieval and answer-composition parameters shared by the retriever and
/// the answerer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RagConfig {
    /// Upper bound on assembled context, in characters
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,

    /// Sampling temperature passed to the generation provider
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens the generation provider may produce
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Nearest records fetched from the store per question
    #[serde(default = "default_retrieval_limit")]
    pub retrieval_limit: usize,

    /// Results below this cosine similarity are dropped
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

const fn default_max_context_length() -> usize {
    4000
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_tokens() -> u32 {
    800
}

const fn default_retrieval_limit() -> usize {
    6
}

const fn default_similarity_threshold() -> f32 {
    0.75
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            max_context_length: default_max_context_length(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            retrieval_limit: default_retrieval_limit(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl RagConfig {
    /// Merge a partial update; unspecified fields keep their current value.
    pub fn apply(&mut self, update: &RagConfigUpdate) {
        if let Some(v) = update.max_context_length {
            self.max_context_length = v;
        }
        if let Some(v) = update.temperature {
            self.temperature = v;
        }
        if let Some(v) = update.max_tokens {
            self.max_tokens = v;
        }
        if let Some(v) = update.retrieval_limit {
            self.retrieval_limit = v;
        }
        if let Some(v) = update.similarity_threshold {
            self.similarity_threshold = v;
        }
    }
}

/// Partial [`RagConfig`] used by `update_config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct RagConfigUpdate {
    pub max_context_length: Option<usize>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub retrieval_limit: Option<usize>,
    pub similarity_threshold: Option<f32>,
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderConfig {
    /// API key. Falls back to `OPENAI_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Chat completion model name
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    /// Bound on each remote call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between consecutive remote embedding calls while indexing
    #[serde(default = "default_embed_delay_ms")]
    pub embed_delay_ms: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_generation_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_embed_delay_ms() -> u64 {
    100
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            embedding_model: default_embedding_model(),
            generation_model: default_generation_model(),
            timeout_secs: default_timeout_secs(),
            embed_delay_ms: default_embed_delay_ms(),
        }
    }
}

impl ProviderConfig {
    /// Configured key, or the `OPENAI_API_KEY` environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Vector store and ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// Fixed vector dimensionality for every record
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Maximum characters per chunk
    #[serde(default = "default_chunk_max_length")]
    pub chunk_max_length: usize,

    /// Chunks shorter than this (after trimming) are not indexed
    #[serde(default = "default_min_chunk_chars")]
    pub min_chunk_chars: usize,
}

const fn default_dimension() -> usize {
    384
}

const fn default_chunk_max_length() -> usize {
    500
}

const fn default_min_chunk_chars() -> usize {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            chunk_max_length: default_chunk_max_length(),
            min_chunk_chars: default_min_chunk_chars(),
        }
    }
}
