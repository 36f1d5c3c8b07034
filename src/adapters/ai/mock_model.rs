//! Mock completion model for testing.
//!
//! Provides a scripted implementation of the CompletionModel port,
//! allowing the agent loop and handlers to run without a real API.
//!
//! # Example
//!
//! ```ignore
//! let model = MockCompletionModel::new()
//!     .with_completion("Thought: done\nFinal Answer: 42");
//!
//! let completion = model.complete(request).await?;
//! assert_eq!(completion.text, "Thought: done\nFinal Answer: 42");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{
    Completion, CompletionError, CompletionModel, CompletionRequest, FinishReason, TokenUsage,
};

/// Scripted completion model for testing.
///
/// Responses are consumed in order; call history is recorded for
/// verification.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionModel {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockCompletion>>>,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockCompletion {
    /// Return a successful completion with this text.
    Success { text: String },
    /// Return an error.
    Error(MockCompletionError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockCompletionError {
    RateLimited { retry_after_secs: u32 },
    ContextTooLong { message: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockCompletionError> for CompletionError {
    fn from(err: MockCompletionError) -> Self {
        match err {
            MockCompletionError::RateLimited { retry_after_secs } => {
                CompletionError::rate_limited(retry_after_secs)
            }
            MockCompletionError::ContextTooLong { message } => {
                CompletionError::context_too_long(message)
            }
            MockCompletionError::Unavailable { message } => CompletionError::unavailable(message),
            MockCompletionError::AuthenticationFailed => CompletionError::AuthenticationFailed,
            MockCompletionError::Network { message } => CompletionError::network(message),
            MockCompletionError::Timeout { timeout_secs } => {
                CompletionError::Timeout { timeout_secs }
            }
        }
    }
}

impl MockCompletionModel {
    /// Creates a new mock model with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a successful completion to the queue.
    pub fn with_completion(self, text: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockCompletion::Success { text: text.into() });
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockCompletionError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockCompletion::Error(error));
        self
    }

    /// Returns the number of calls made to this model.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockCompletion {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockCompletion::Success {
                text: "Mock completion".to_string(),
            })
    }
}

#[async_trait]
impl CompletionModel for MockCompletionModel {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, CompletionError> {
        self.calls.lock().unwrap().push(request);

        match self.next_response() {
            MockCompletion::Success { text } => Ok(Completion {
                text,
                model: "mock-model".to_string(),
                finish_reason: FinishReason::Stop,
                usage: TokenUsage::new(10, 20),
            }),
            MockCompletion::Error(err) => Err(err.into()),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest::new(prompt)
    }

    #[tokio::test]
    async fn returns_scripted_completions_in_order() {
        let model = MockCompletionModel::new()
            .with_completion("First")
            .with_completion("Second");

        let first = model.complete(request("a")).await.unwrap();
        let second = model.complete(request("b")).await.unwrap();

        assert_eq!(first.text, "First");
        assert_eq!(second.text, "Second");
    }

    #[tokio::test]
    async fn returns_default_after_queue_exhausted() {
        let model = MockCompletionModel::new().with_completion("Only one");

        model.complete(request("a")).await.unwrap();
        let fallback = model.complete(request("b")).await.unwrap();

        assert_eq!(fallback.text, "Mock completion");
    }

    #[tokio::test]
    async fn returns_scripted_error() {
        let model = MockCompletionModel::new().with_error(MockCompletionError::RateLimited {
            retry_after_secs: 30,
        });

        let err = model.complete(request("a")).await.unwrap_err();
        assert!(matches!(
            err,
            CompletionError::RateLimited {
                retry_after_secs: 30
            }
        ));
    }

    #[tokio::test]
    async fn records_calls_with_their_prompts() {
        let model = MockCompletionModel::new()
            .with_completion("one")
            .with_completion("two");

        assert_eq!(model.call_count(), 0);

        model.complete(request("first prompt")).await.unwrap();
        model.complete(request("second prompt")).await.unwrap();

        assert_eq!(model.call_count(), 2);
        let calls = model.get_calls();
        assert_eq!(calls[0].prompt, "first prompt");
        assert_eq!(calls[1].prompt, "second prompt");
    }

    #[test]
    fn mock_errors_convert() {
        let err: CompletionError = MockCompletionError::AuthenticationFailed.into();
        assert!(matches!(err, CompletionError::AuthenticationFailed));

        let err: CompletionError = MockCompletionError::Timeout { timeout_secs: 9 }.into();
        assert!(matches!(err, CompletionError::Timeout { timeout_secs: 9 }));
    }
}
