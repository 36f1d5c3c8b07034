//! Append-only record of the steps taken during one agent run.

use super::action::AgentAction;
use super::tools::ToolOutcome;

/// One completed step: the action the model chose and what came back.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub action: AgentAction,
    pub outcome: ToolOutcome,
}

/// Ordered history of steps, rendered into each successive prompt.
///
/// Strictly append-only: steps are never rewritten or dropped, so the
/// model always sees the full run so far.
#[derive(Debug, Clone, Default)]
pub struct Scratchpad {
    steps: Vec<Step>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed step.
    pub fn append(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Render the transcript section of the prompt.
    ///
    /// Each step replays the model's own text followed by the observation,
    /// then reopens a `Thought:` so the model continues the pattern. The
    /// structured outcome is flattened to text only here, at the boundary
    /// where it joins the model-facing transcript.
    pub fn render(&self) -> String {
        let mut transcript = String::new();
        for step in &self.steps {
            transcript.push_str(&step.action.log);
            transcript.push_str("\nObservation: ");
            transcript.push_str(step.outcome.render());
            transcript.push_str("\nThought: ");
        }
        transcript
    }
}
