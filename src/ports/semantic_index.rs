//! Semantic Index Port - Interface for the vector similarity index.

use async_trait::async_trait;

use crate::domain::catalog::ContextDocument;
use crate::ports::embedding_model::EmbeddingError;

/// Port for the document similarity index.
///
/// Query side: map free text to the `k` nearest context documents.
/// Write side: store crawled documents with their metadata.
#[async_trait]
pub trait SemanticIndex: Send + Sync {
    /// Return the `k` documents nearest to the query text, best first.
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ContextDocument>, IndexError>;

    /// Insert or overwrite documents in the index.
    async fn add_documents(&self, documents: &[ContextDocument]) -> Result<(), IndexError>;
}

/// Semantic index errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Embedding the query or documents failed.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Index service is unavailable.
    #[error("index unavailable: {message}")]
    Unavailable { message: String },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse an index response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl IndexError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_errors_convert() {
        let err: IndexError = EmbeddingError::AuthenticationFailed.into();
        assert!(err.to_string().contains("embedding failed"));
    }
}
