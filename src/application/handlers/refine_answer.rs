//! AnswerRefiner - one model pass that turns raw agent output into prose.
//!
//! The agent's terminal text can still contain Action markup or a bare
//! number; one further completion rewrites it for the reader. Any
//! failure here degrades to the input text, so refinement can never
//! lose an answer the loop already produced.

use std::sync::Arc;

use crate::domain::agent::render_refine_prompt;
use crate::ports::{CompletionModel, CompletionRequest};

/// Rewrites raw agent output into reader-facing prose.
pub struct AnswerRefiner {
    model: Arc<dyn CompletionModel>,
    temperature: f32,
}

impl AnswerRefiner {
    pub fn new(model: Arc<dyn CompletionModel>, temperature: f32) -> Self {
        Self { model, temperature }
    }

    /// Refines the output, or returns it unchanged when the model call
    /// fails.
    pub async fn refine(&self, output: &str) -> String {
        let prompt = render_refine_prompt(output);
        let request = CompletionRequest::new(prompt).with_temperature(self.temperature);

        match self.model.complete(request).await {
            Ok(completion) => completion.text.trim().to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "refinement failed, keeping the unrefined answer");
                output.to_string()
            }
        }
    }
}
