//! Domain errors for the meeting retrieval pipeline.

use std::time::Duration;

use thiserror::Error;

/// Errors raised at the remote provider boundary (embedding and generation).
///
/// These never escape the pipeline: the embedder and answerer match on them
/// and switch to their local fallbacks.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider credential is not configured")]
    MissingCredential,

    #[error("Provider request failed: {0}")]
    Transport(String),

    #[error("Provider returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider returned a {actual}-dimensional vector, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl ProviderError {
    /// Short machine-friendly label used in log fields.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Transport(_) => "transport",
            Self::Http { .. } => "http",
            Self::Timeout(_) => "timeout",
            Self::InvalidResponse(_) => "invalid_response",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Domain-level errors for store operations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Vector has {actual} dimensions, store expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
