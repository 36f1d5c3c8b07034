//! Agent domain
//!
//! Pure types and logic for the reason/act loop that answers warehouse
//! questions: the decision grammar the model's output must follow, the
//! append-only scratchpad of past steps, the tool abstraction, and the
//! prompt rendering that ties them together. Nothing in this module
//! performs I/O; the loop driver lives in the application layer.

pub mod action;
pub mod errors;
pub mod parser;
pub mod prompt;
pub mod scratchpad;
pub mod tools;

pub use action::{AgentAction, AgentDecision, AgentFinish};
pub use errors::{OutputParseError, ParseFailureKind};
pub use parser::{parse_agent_output, salvage_raw_output};
pub use prompt::{render_agent_prompt, render_refine_prompt, STOP_SEQUENCES};
pub use scratchpad::{Scratchpad, Step};
pub use tools::{Tool, ToolOutcome, ToolSet};
