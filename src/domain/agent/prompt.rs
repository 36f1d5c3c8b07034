//! Prompt rendering for the agent loop and the answer refiner.

use super::scratchpad::Scratchpad;
use super::tools::ToolSet;

/// Stop sequences handed to the completion model so generation halts
/// before the model invents its own `Observation:` section. The second
/// variant catches models that indent the marker.
pub const STOP_SEQUENCES: [&str; 2] = ["\nObservation", "\n\tObservation"];

const AGENT_TEMPLATE: &str = r#"You are an agent designed to interact with an AWS Redshift database. You have access to the following tools:

{tools}

Create the query and answer from the context below:
```
{context}
```

Given an input question, create a syntactically correct Redshift SQL query to run. DO NOT make any DML statements (INSERT, UPDATE, DELETE, DROP etc.) to the database.
Use the following format:

Question: the input question you must answer
Thought: plan the query from the question and the given context, and validate the query before running it
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the chosen action, as a single line without markdown
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: a concise and specific answer to the question based on the query result, including:
1. The exact answer to the question (e.g. "The seller_id with the highest total sales value is 22")
2. The SQL query used to obtain this result
3. A brief explanation of how you arrived at this answer

Begin!

Question: {input}
Thought: {agent_scratchpad}"#;

const REFINE_TEMPLATE: &str = r#"Given the following output:
{output}

Rewrite it as plain prose. Turn any remaining Action or Action Input lines into sentences, and rephrase the final answer so it is not a bare number while keeping its context."#;

/// Render the full agent prompt for the next model call.
pub fn render_agent_prompt(
    tools: &ToolSet,
    context: &str,
    question: &str,
    scratchpad: &Scratchpad,
) -> String {
    AGENT_TEMPLATE
        .replace("{tools}", &tools.render_descriptions())
        .replace("{tool_names}", &tools.names())
        .replace("{context}", context)
        .replace("{input}", question)
        .replace("{agent_scratchpad}", &scratchpad.render())
}

/// Render the single-shot refinement prompt.
pub fn render_refine_prompt(output: &str) -> String {
    REFINE_TEMPLATE.replace("{output}", output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::tools::{Tool, ToolOutcome};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "does a thing"
        }

        async fn call(&self, _input: &str) -> ToolOutcome {
            ToolOutcome::Success(String::new())
        }
    }

    fn tools() -> ToolSet {
        ToolSet::new(vec![
            Arc::new(NamedTool("validate_redshift_query")),
            Arc::new(NamedTool("run_redshift_query")),
        ])
    }

    #[test]
    fn substitutes_every_placeholder() {
        let prompt = render_agent_prompt(
            &tools(),
            "Table `dm_sales` holds sales facts.",
            "How many sales last week?",
            &Scratchpad::new(),
        );

        assert!(!prompt.contains("{tools}"));
        assert!(!prompt.contains("{tool_names}"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{input}"));
        assert!(!prompt.contains("{agent_scratchpad}"));
    }

    #[test]
    fn lists_tool_names_inside_brackets() {
        let prompt = render_agent_prompt(&tools(), "", "q", &Scratchpad::new());
        assert!(prompt.contains("[validate_redshift_query, run_redshift_query]"));
    }

    #[test]
    fn question_and_context_appear_verbatim() {
        let prompt = render_agent_prompt(
            &tools(),
            "Table `dm_route` describes routes.",
            "Which route is longest?",
            &Scratchpad::new(),
        );

        assert!(prompt.contains("Question: Which route is longest?"));
        assert!(prompt.contains("Table `dm_route` describes routes."));
    }

    #[test]
    fn empty_scratchpad_leaves_open_thought() {
        let prompt = render_agent_prompt(&tools(), "", "q", &Scratchpad::new());
        assert!(prompt.ends_with("Thought: "));
    }

    #[test]
    fn context_is_fenced() {
        let prompt = render_agent_prompt(&tools(), "schema text", "q", &Scratchpad::new());
        assert!(prompt.contains("```\nschema text\n```"));
    }

    #[test]
    fn forbids_dml_statements() {
        let prompt = render_agent_prompt(&tools(), "", "q", &Scratchpad::new());
        assert!(prompt.contains("DO NOT make any DML statements"));
    }

    #[test]
    fn refine_prompt_embeds_output() {
        let prompt = render_refine_prompt("Final Answer: 12");
        assert!(prompt.contains("Given the following output:\nFinal Answer: 12"));
    }

    #[test]
    fn stop_sequences_halt_before_observation() {
        assert!(STOP_SEQUENCES.contains(&"\nObservation"));
    }
}
