//! Completion Model Port - Interface for text completion providers.
//!
//! The agent loop, the answer refiner, and the crawler's assumption
//! summary all talk to a language model through this port: one rendered
//! prompt in, one block of text out. Stop sequences let the caller halt
//! generation at grammar boundaries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for text completion providers.
///
/// Implementations connect to an external model service and translate
/// between its API and these types.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate a single completion for the rendered prompt.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, CompletionError>;

    /// Model identifier used in logs.
    fn model_name(&self) -> &str;
}

/// Request for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The fully rendered prompt text.
    pub prompt: String,
    /// Sequences at which the provider must stop generating.
    pub stop: Vec<String>,
    /// Sampling temperature; providers fall back to their default when unset.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Creates a new request for the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            stop: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets the stop sequences.
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = stop.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// One generated completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Generated text.
    pub text: String,
    /// Model that generated it.
    pub model: String,
    /// Why generation stopped.
    pub finish_reason: FinishReason,
    /// Token usage reported by the provider.
    pub usage: TokenUsage,
}

/// Token usage reported with a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop or a stop sequence was hit.
    Stop,
    /// Hit the max_tokens limit.
    Length,
    /// Content was filtered by the provider.
    ContentFilter,
    /// The provider reported an error mid-generation.
    Error,
}

/// Completion provider errors.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Prompt exceeds the model's context window.
    #[error("context too long: {message}")]
    ContextTooLong { message: String },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl CompletionError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a context too long error.
    pub fn context_too_long(message: impl Into<String>) -> Self {
        Self::ContextTooLong {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::RateLimited { .. }
                | CompletionError::Unavailable { .. }
                | CompletionError::Network(_)
                | CompletionError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_all_fields() {
        let request = CompletionRequest::new("Question: how many routes?")
            .with_stop(["\nObservation"])
            .with_temperature(0.0)
            .with_max_tokens(512);

        assert_eq!(request.prompt, "Question: how many routes?");
        assert_eq!(request.stop, vec!["\nObservation".to_string()]);
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.max_tokens, Some(512));
    }

    #[test]
    fn token_usage_calculates_total() {
        let usage = TokenUsage::new(120, 30);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn retryable_classification() {
        assert!(CompletionError::rate_limited(30).is_retryable());
        assert!(CompletionError::unavailable("down").is_retryable());
        assert!(CompletionError::network("reset").is_retryable());
        assert!(CompletionError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!CompletionError::AuthenticationFailed.is_retryable());
        assert!(!CompletionError::context_too_long("too big").is_retryable());
        assert!(!CompletionError::parse("bad json").is_retryable());
    }

    #[test]
    fn finish_reason_serializes_snake_case() {
        let json = serde_json::to_string(&FinishReason::ContentFilter).unwrap();
        assert_eq!(json, "\"content_filter\"");
    }
}
