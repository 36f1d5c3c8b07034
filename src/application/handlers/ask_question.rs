//! AskQuestionHandler - the end-to-end question flow.
//!
//! Retrieve context, run the agent, refine the outcome. The contract is
//! always-a-string: a finished run yields its refined answer, a parse
//! failure yields the refined salvage text, and every other fatal run
//! error folds into an apologetic answer. Only faults before the run
//! starts (context retrieval) surface as errors.

use std::sync::Arc;

use crate::domain::agent::salvage_raw_output;
use crate::ports::{IndexError, SemanticIndex};

use super::refine_answer::AnswerRefiner;
use super::run_agent::{AgentRunError, AgentRunner};

/// Error type for the ask flow.
#[derive(Debug, thiserror::Error)]
pub enum AskQuestionError {
    /// Context retrieval failed before the run started.
    #[error("context retrieval failed: {0}")]
    Retrieval(#[from] IndexError),
}

/// Answers one natural-language question over the warehouse.
pub struct AskQuestionHandler {
    index: Arc<dyn SemanticIndex>,
    runner: AgentRunner,
    refiner: AnswerRefiner,
    top_k: usize,
}

impl AskQuestionHandler {
    pub fn new(
        index: Arc<dyn SemanticIndex>,
        runner: AgentRunner,
        refiner: AnswerRefiner,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            runner,
            refiner,
            top_k,
        }
    }

    /// Resolves a question to an answer string.
    pub async fn handle(&self, question: &str) -> Result<String, AskQuestionError> {
        let documents = self.index.similarity_search(question, self.top_k).await?;
        tracing::debug!(documents = documents.len(), "context retrieved");

        let context = documents
            .iter()
            .map(|doc| doc.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let raw_answer = match self.runner.run(question, &context).await {
            Ok(finish) => finish.answer,
            Err(AgentRunError::MalformedOutput(parse_err)) => {
                // Lossy heuristic: the tail usually holds the broken
                // grammar, the head holds the useful text
                tracing::warn!(error = %parse_err, "run failed to parse, salvaging output");
                salvage_raw_output(&parse_err.raw)
            }
            Err(fatal) => {
                tracing::warn!(error = %fatal, "run failed");
                return Ok(format!(
                    "Sorry, I could not answer that question: {}",
                    fatal
                ));
            }
        };

        Ok(self.refiner.refine(&raw_answer).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockCompletionError, MockCompletionModel};
    use crate::domain::agent::ToolSet;
    use crate::domain::catalog::{ContextDocument, DocumentMetadata};
    use async_trait::async_trait;
    use chrono::Utc;

    /// Index fake returning fixed documents.
    struct FakeIndex {
        documents: Vec<ContextDocument>,
        fail: bool,
    }

    impl FakeIndex {
        fn with_texts(texts: &[&str]) -> Self {
            let documents = texts
                .iter()
                .map(|text| ContextDocument {
                    text: text.to_string(),
                    metadata: DocumentMetadata {
                        table_name: "dm_sales".to_string(),
                        schema_name: "lrt_demo".to_string(),
                        primary_key: None,
                        crawled_at: Utc::now(),
                    },
                })
                .collect();
            Self {
                documents,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                documents: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SemanticIndex for FakeIndex {
        async fn similarity_search(
            &self,
            _query: &str,
            _k: usize,
        ) -> Result<Vec<ContextDocument>, IndexError> {
            if self.fail {
                return Err(IndexError::unavailable("index down"));
            }
            Ok(self.documents.clone())
        }

        async fn add_documents(&self, _documents: &[ContextDocument]) -> Result<(), IndexError> {
            unimplemented!("not exercised by ask tests")
        }
    }

    fn handler_with(index: FakeIndex, model: &MockCompletionModel) -> AskQuestionHandler {
        let shared: Arc<dyn crate::ports::CompletionModel> = Arc::new(model.clone());
        let runner = AgentRunner::new(shared.clone(), ToolSet::new(vec![]), 15, 0.0);
        let refiner = AnswerRefiner::new(shared, 0.0);
        AskQuestionHandler::new(Arc::new(index), runner, refiner, 5)
    }

    #[tokio::test]
    async fn finished_run_yields_the_refined_answer() {
        let model = MockCompletionModel::new()
            .with_completion("Done\nFinal Answer: 22")
            .with_completion("The seller with the highest sales value is seller 22.");
        let handler = handler_with(FakeIndex::with_texts(&["sales doc"]), &model);

        let answer = handler
            .handle("Which seller has the highest sales?")
            .await
            .unwrap();

        assert_eq!(
            answer,
            "The seller with the highest sales value is seller 22."
        );
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn retrieved_documents_join_into_the_context_block() {
        let model = MockCompletionModel::new()
            .with_completion("Done\nFinal Answer: nothing")
            .with_completion("prose");
        let handler = handler_with(FakeIndex::with_texts(&["first doc", "second doc"]), &model);

        handler.handle("q").await.unwrap();

        let calls = model.get_calls();
        assert!(calls[0].prompt.contains("first doc\nsecond doc"));
    }

    #[tokio::test]
    async fn parse_failure_salvages_and_still_refines() {
        let model = MockCompletionModel::new()
            .with_completion("Useful reasoning line\nsecond line\nbroken grammar tail")
            .with_completion("refined salvage");
        let handler = handler_with(FakeIndex::with_texts(&["doc"]), &model);

        let answer = handler.handle("q").await.unwrap();

        assert_eq!(answer, "refined salvage");
        // The refiner received the salvaged text, last two lines dropped
        let calls = model.get_calls();
        assert!(calls[1].prompt.contains("Useful reasoning line"));
        assert!(!calls[1].prompt.contains("broken grammar tail"));
    }

    #[tokio::test]
    async fn fatal_run_errors_fold_into_an_apologetic_answer() {
        let model = MockCompletionModel::new().with_error(MockCompletionError::Unavailable {
            message: "down".to_string(),
        });
        let handler = handler_with(FakeIndex::with_texts(&["doc"]), &model);

        let answer = handler.handle("q").await.unwrap();

        assert!(answer.starts_with("Sorry, I could not answer that question:"));
        // No refinement call after a fatal error
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn retrieval_failure_is_an_error_not_an_answer() {
        let model = MockCompletionModel::new();
        let handler = handler_with(FakeIndex::failing(), &model);

        let err = handler.handle("q").await.unwrap_err();

        assert!(matches!(err, AskQuestionError::Retrieval(_)));
        assert_eq!(model.call_count(), 0);
    }
}
