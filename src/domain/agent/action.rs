//! Agent decisions parsed from model output.

/// A parsed model decision: either invoke a tool or finish the run.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentDecision {
    /// Invoke the named tool with the given input.
    Act(AgentAction),
    /// Terminate the run with a final answer.
    Finish(AgentFinish),
}

/// One tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentAction {
    /// Tool name exactly as the model wrote it.
    pub tool: String,

    /// Tool input with surrounding spaces and double quotes stripped.
    pub tool_input: String,

    /// The full raw model output that produced this action.
    ///
    /// Kept verbatim because it is replayed into the next prompt as part
    /// of the scratchpad transcript.
    pub log: String,
}

/// The terminal answer of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentFinish {
    /// Answer text following the final-answer marker.
    pub answer: String,

    /// The full raw model output that produced this answer.
    pub log: String,
}
