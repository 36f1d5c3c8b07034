//! AI adapters - OpenAI implementations of the model ports.
//!
//! ## Available Adapters
//!
//! - `OpenAiCompletionModel` - Chat completions for the agent and refiner
//! - `OpenAiEmbeddingModel` - Batch embeddings for the semantic index
//! - `MockCompletionModel` - Scripted mock for testing

mod mock_model;
mod openai_completions;
mod openai_embeddings;

pub use mock_model::{MockCompletion, MockCompletionError, MockCompletionModel};
pub use openai_completions::{OpenAiCompletionConfig, OpenAiCompletionModel};
pub use openai_embeddings::{OpenAiEmbeddingConfig, OpenAiEmbeddingModel};
