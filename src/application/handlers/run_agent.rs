//! AgentRunner - the bounded think/act/observe loop.
//!
//! One run drives repeated model calls over a growing scratchpad until
//! the model produces a final answer, the output stops parsing, or the
//! step budget runs out. Stop sequences cut generation at the start of
//! an Observation section, so each call yields exactly one decision.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::agent::{
    parse_agent_output, render_agent_prompt, AgentDecision, AgentFinish, OutputParseError,
    Scratchpad, Step, ToolSet, STOP_SEQUENCES,
};
use crate::ports::{CompletionError, CompletionModel, CompletionRequest};

/// Error type for an agent run.
///
/// Every variant is fatal to its run; recoverable tool failures never
/// reach this level because they become observations instead.
#[derive(Debug, thiserror::Error)]
pub enum AgentRunError {
    /// The model chose a tool that is not in the set.
    #[error("model output named an unknown tool: {name}")]
    UnknownTool { name: String },

    /// The model output matched neither grammar, or both.
    #[error(transparent)]
    MalformedOutput(#[from] OutputParseError),

    /// The scratchpad filled up without a final answer.
    #[error("step budget of {max_steps} exhausted without a final answer")]
    StepBudgetExceeded { max_steps: usize },

    /// The completion call itself failed.
    #[error("model call failed: {0}")]
    Model(#[from] CompletionError),
}

/// Drives one agent run to completion.
pub struct AgentRunner {
    model: Arc<dyn CompletionModel>,
    tools: ToolSet,
    max_steps: usize,
    temperature: f32,
}

impl AgentRunner {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        tools: ToolSet,
        max_steps: usize,
        temperature: f32,
    ) -> Self {
        Self {
            model,
            tools,
            max_steps,
            temperature,
        }
    }

    /// Runs the loop for one question over the retrieved context.
    ///
    /// Returns the model's final answer, or the first fatal error. The
    /// scratchpad is internal to the run; each iteration appends at
    /// most one step.
    pub async fn run(&self, question: &str, context: &str) -> Result<AgentFinish, AgentRunError> {
        let run_id = Uuid::new_v4();
        let mut scratchpad = Scratchpad::new();

        loop {
            if scratchpad.len() >= self.max_steps {
                tracing::warn!(%run_id, max_steps = self.max_steps, "step budget exhausted");
                return Err(AgentRunError::StepBudgetExceeded {
                    max_steps: self.max_steps,
                });
            }

            let prompt = render_agent_prompt(&self.tools, context, question, &scratchpad);
            let request = CompletionRequest::new(prompt)
                .with_stop(STOP_SEQUENCES)
                .with_temperature(self.temperature);

            let completion = self.model.complete(request).await?;

            match parse_agent_output(&completion.text)? {
                AgentDecision::Act(action) => {
                    let tool = self.tools.get(&action.tool).ok_or_else(|| {
                        tracing::warn!(%run_id, tool = %action.tool, "unknown tool requested");
                        AgentRunError::UnknownTool {
                            name: action.tool.clone(),
                        }
                    })?;

                    let outcome = tool.call(&action.tool_input).await;
                    tracing::debug!(
                        %run_id,
                        step = scratchpad.len() + 1,
                        tool = %action.tool,
                        failed = outcome.is_failure(),
                        "tool dispatched"
                    );
                    scratchpad.append(Step { action, outcome });
                }
                AgentDecision::Finish(finish) => {
                    tracing::debug!(%run_id, steps = scratchpad.len(), "run finished");
                    return Ok(finish);
                }
            }
        }
    }
}
