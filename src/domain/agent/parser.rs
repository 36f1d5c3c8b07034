//! Model output parsing for the reason/act grammar.
//!
//! The prompt instructs the model to reply with either
//!
//! ```text
//! Thought: <reasoning>
//! Action: <tool name>
//! Action Input: <tool input>
//! ```
//!
//! or
//!
//! ```text
//! Thought: I now know the final answer
//! Final Answer: <answer>
//! ```
//!
//! This module classifies a completion into exactly one [`AgentDecision`]
//! or a typed parse failure. Output matching both grammars at once is a
//! failure, never a guess.

use once_cell::sync::Lazy;
use regex::Regex;

use super::action::{AgentAction, AgentDecision, AgentFinish};
use super::errors::{OutputParseError, ParseFailureKind};

const FINAL_ANSWER_MARKER: &str = "Final Answer:";

// Tolerates optional numbering ("Action 2:") and stray whitespace; the
// input capture runs to the end of the block, so multi-line inputs are
// carried through untruncated.
static ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:\s*(.*?)\s*Action\s*\d*\s*Input\s*\d*\s*:\s*(.*)")
        .expect("action grammar regex is valid")
});

static ACTION_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Action\s*\d*\s*:").expect("action marker regex is valid"));

static ACTION_INPUT_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Action\s*\d*\s*Input\s*\d*\s*:").expect("action input marker regex is valid")
});

/// Parse one model completion into an agent decision.
///
/// # Errors
///
/// Returns [`OutputParseError`] carrying the raw output when the text is
/// ambiguous, is missing a grammar marker, or matches no grammar at all.
pub fn parse_agent_output(text: &str) -> Result<AgentDecision, OutputParseError> {
    let includes_answer = text.contains(FINAL_ANSWER_MARKER);

    if let Some(captures) = ACTION_RE.captures(text) {
        if includes_answer {
            return Err(OutputParseError::new(
                ParseFailureKind::AmbiguousDecision,
                text,
            ));
        }

        let tool = captures[1].trim().to_string();
        let tool_input = captures[2].trim().trim_matches('"').to_string();

        return Ok(AgentDecision::Act(AgentAction {
            tool,
            tool_input,
            log: text.to_string(),
        }));
    }

    if let Some(idx) = text.rfind(FINAL_ANSWER_MARKER) {
        let answer = text[idx + FINAL_ANSWER_MARKER.len()..].trim().to_string();
        return Ok(AgentDecision::Finish(AgentFinish {
            answer,
            log: text.to_string(),
        }));
    }

    let kind = if !ACTION_MARKER_RE.is_match(text) {
        ParseFailureKind::MissingAction
    } else if !ACTION_INPUT_MARKER_RE.is_match(text) {
        ParseFailureKind::MissingActionInput
    } else {
        ParseFailureKind::Unrecognized
    };

    Err(OutputParseError::new(kind, text))
}

/// Degrade unparseable model output into something presentable by
/// dropping the trailing marker lines.
///
/// The last two lines of a malformed block are typically the dangling
/// `Action:`/`Action Input:` pair (or a half-written equivalent), so
/// cutting them keeps the model's prose reasoning. Lossy by design.
pub fn salvage_raw_output(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    let keep = lines.len().saturating_sub(2);
    lines[..keep].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_tool_action_with_input() {
        let text = "Thought: I should check the query first\n\
                    Action: validate_redshift_query\n\
                    Action Input: SELECT count(*) FROM lrt_demo.dm_sales";

        let decision = parse_agent_output(text).unwrap();
        match decision {
            AgentDecision::Act(action) => {
                assert_eq!(action.tool, "validate_redshift_query");
                assert_eq!(
                    action.tool_input,
                    "SELECT count(*) FROM lrt_demo.dm_sales"
                );
                assert_eq!(action.log, text);
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn tool_input_keeps_interior_newlines() {
        let text = "Thought: build the query\n\
                    Action: run_redshift_query\n\
                    Action Input: SELECT route_id\nFROM lrt_demo.dm_route\nLIMIT 3";

        let decision = parse_agent_output(text).unwrap();
        match decision {
            AgentDecision::Act(action) => {
                assert_eq!(
                    action.tool_input,
                    "SELECT route_id\nFROM lrt_demo.dm_route\nLIMIT 3"
                );
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn strips_surrounding_quotes_from_input() {
        let text = "Thought: ok\nAction: run_redshift_query\nAction Input: \"SELECT 1\"";

        let decision = parse_agent_output(text).unwrap();
        match decision {
            AgentDecision::Act(action) => assert_eq!(action.tool_input, "SELECT 1"),
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn accepts_numbered_markers() {
        let text = "Thought: second try\nAction 2: run_redshift_query\nAction 2 Input 2: SELECT 1";

        let decision = parse_agent_output(text).unwrap();
        match decision {
            AgentDecision::Act(action) => {
                assert_eq!(action.tool, "run_redshift_query");
                assert_eq!(action.tool_input, "SELECT 1");
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn parses_final_answer() {
        let text = "Thought: I now know the final answer\nFinal Answer: There are 42 routes.";

        let decision = parse_agent_output(text).unwrap();
        match decision {
            AgentDecision::Finish(finish) => {
                assert_eq!(finish.answer, "There are 42 routes.");
                assert_eq!(finish.log, text);
            }
            other => panic!("expected finish, got {other:?}"),
        }
    }

    #[test]
    fn final_answer_uses_last_marker() {
        let text = "Thought: the phrase Final Answer: appears twice\nFinal Answer: 7 incidents";

        let decision = parse_agent_output(text).unwrap();
        match decision {
            AgentDecision::Finish(finish) => assert_eq!(finish.answer, "7 incidents"),
            other => panic!("expected finish, got {other:?}"),
        }
    }

    #[test]
    fn both_action_and_final_answer_is_ambiguous() {
        let text = "Thought: done\n\
                    Action: run_redshift_query\n\
                    Action Input: SELECT 1\n\
                    Final Answer: one";

        let err = parse_agent_output(text).unwrap_err();
        assert_eq!(err.kind, ParseFailureKind::AmbiguousDecision);
        assert_eq!(err.raw, text);
    }

    #[test]
    fn thought_without_action_is_missing_action() {
        let err = parse_agent_output("Thought: I wonder what to do next").unwrap_err();
        assert_eq!(err.kind, ParseFailureKind::MissingAction);
    }

    #[test]
    fn action_without_input_is_missing_action_input() {
        let err = parse_agent_output("Thought: ok\nAction: run_redshift_query").unwrap_err();
        assert_eq!(err.kind, ParseFailureKind::MissingActionInput);
    }

    #[test]
    fn reversed_markers_are_unrecognized() {
        // Both markers present but in an order the grammar cannot match.
        let err =
            parse_agent_output("Action Input: SELECT 1\nAction: run_redshift_query").unwrap_err();
        assert_eq!(err.kind, ParseFailureKind::Unrecognized);
    }

    #[test]
    fn salvage_drops_last_two_lines() {
        let raw = "The sales total is around 1200 units.\nAction: run_redshift_query\nAction Input:";
        assert_eq!(salvage_raw_output(raw), "The sales total is around 1200 units.");
    }

    #[test]
    fn salvage_of_short_output_is_empty() {
        assert_eq!(salvage_raw_output("one line"), "");
        assert_eq!(salvage_raw_output("one\ntwo"), "");
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_text(text in ".{0,400}") {
            let _ = parse_agent_output(&text);
        }

        #[test]
        fn text_without_markers_never_parses(text in "[a-z ]{0,200}") {
            prop_assume!(!text.contains("Action") && !text.contains("Final Answer:"));
            prop_assert!(parse_agent_output(&text).is_err());
        }
    }
}
