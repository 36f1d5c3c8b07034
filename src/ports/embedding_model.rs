//! Embedding Model Port - Interface for text embedding providers.

use async_trait::async_trait;

/// Port for batch text embedding.
///
/// Used by the crawler to embed context documents and by the semantic
/// index adapter to embed queries at search time.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embed a batch of texts, one vector per input in the same order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Model identifier used in logs.
    fn model_name(&self) -> &str;
}

/// Embedding provider errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The provider returned a different number of vectors than inputs.
    #[error("embedding count mismatch: {expected} inputs, {actual} vectors")]
    CountMismatch { expected: usize, actual: usize },
}

impl EmbeddingError {
    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::RateLimited { .. }
                | EmbeddingError::Unavailable { .. }
                | EmbeddingError::Network(_)
        )
    }
}
