//! Error types for the agent domain

/// Model output that matched neither the action grammar nor the
/// final-answer grammar, or ambiguously matched both.
///
/// Carries the raw output so callers can salvage a degraded answer
/// out of it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("could not parse model output: {kind}")]
pub struct OutputParseError {
    /// What exactly failed to parse.
    pub kind: ParseFailureKind,

    /// The unmodified model output.
    pub raw: String,
}

impl OutputParseError {
    pub fn new(kind: ParseFailureKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }
}

/// Classification of an output parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailureKind {
    /// The output contained both a parseable action and a final answer.
    #[error("output contains both a final answer and a tool action")]
    AmbiguousDecision,

    /// No `Action:` marker followed the thought.
    #[error("missing 'Action:' after 'Thought:'")]
    MissingAction,

    /// An `Action:` marker appeared without an `Action Input:` marker.
    #[error("missing 'Action Input:' after 'Action:'")]
    MissingActionInput,

    /// The output matched no part of the expected grammar.
    #[error("output matches neither an action nor a final answer")]
    Unrecognized,
}
