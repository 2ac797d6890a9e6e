//! Text embedding with a deterministic local fallback.
//!
//! [`Embedder`] is the only place the pipeline turns text into vectors. It
//! prefers the remote provider when one is configured and silently degrades
//! to [`FallbackEmbedder`] on any provider failure, so callers always get a
//! vector of the store's dimension.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::logging::scrub_secrets;
use crate::infrastructure::vector::FallbackEmbedder;

/// Longest text, in characters, sent to any embedder.
pub const MAX_EMBED_CHARS: usize = 8000;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\p{Han}]").expect("valid character class regex"));

/// Collapse whitespace runs, strip punctuation and symbols, cap the length.
pub fn normalize_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text.trim(), " ");
    let stripped = DISALLOWED_CHARS.replace_all(&collapsed, "");
    stripped.chars().take(MAX_EMBED_CHARS).collect()
}

/// Remote-first embedder.
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    fallback: FallbackEmbedder,
    timeout: Duration,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, dimension: usize, timeout: Duration) -> Self {
        Self {
            provider,
            fallback: FallbackEmbedder::new(dimension),
            timeout,
        }
    }

    /// Output vector length.
    pub const fn dimension(&self) -> usize {
        self.fallback.dimensions()
    }

    /// Whether calls will go to the remote provider first.
    pub fn is_remote_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Embed `text`. Never fails.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        let normalized = normalize_text(text);

        if self.provider.is_configured() {
            match self.embed_remote(&normalized).await {
                Ok(vector) => return vector,
                Err(err) => {
                    warn!(
                        provider = self.provider.name(),
                        kind = err.kind(),
                        error = %scrub_secrets(&err.to_string()),
                        "remote embedding failed, using local fallback"
                    );
                }
            }
        } else {
            debug!("no embedding provider configured, using local fallback");
        }

        self.fallback.embed(&normalized)
    }

    async fn embed_remote(&self, text: &str) -> ProviderResult<Vec<f32>> {
        let vector = tokio::time::timeout(self.timeout, self.provider.embed(text))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;

        if vector.len() != self.dimension() {
            return Err(ProviderError::DimensionMismatch {
                expected: self.dimension(),
                actual: vector.len(),
            });
        }
        Ok(vector)
    }
}
