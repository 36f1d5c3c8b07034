//! Tool abstraction and the fixed tool set exposed to the model.

use async_trait::async_trait;
use std::sync::Arc;

/// Structured result of one tool invocation.
///
/// Tools never return errors; every failure is folded into a `Failure`
/// outcome here and rendered into the transcript at the last moment, so
/// the loop can keep running and the model sees the failure as an
/// ordinary observation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(String),
    Failure(String),
}

impl ToolOutcome {
    /// Render the outcome as the observation string fed back to the model.
    pub fn render(&self) -> &str {
        match self {
            ToolOutcome::Success(text) => text,
            ToolOutcome::Failure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ToolOutcome::Failure(_))
    }
}

/// A capability the model can invoke by name with a single string input.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model must use in its `Action:` line.
    fn name(&self) -> &str;

    /// One-line description rendered into the prompt.
    fn description(&self) -> &str;

    /// Invoke the tool. Infallible by contract; see [`ToolOutcome`].
    async fn call(&self, input: &str) -> ToolOutcome;
}

/// The fixed, named set of tools available to one agent run.
///
/// Lookup is by exact name; an action naming anything else is the
/// caller's cue to abort the run.
#[derive(Clone)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Look up a tool by its exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Comma-separated tool names for the prompt's allowed-actions line.
    pub fn names(&self) -> String {
        self.tools
            .iter()
            .map(|tool| tool.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `name: description` lines rendered into the prompt.
    pub fn render_descriptions(&self) -> String {
        self.tools
            .iter()
            .map(|tool| format!("{}: {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
