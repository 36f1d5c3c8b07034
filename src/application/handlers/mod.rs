//! Application handlers.
//!
//! Handlers that orchestrate domain operations through the ports.

pub mod ask_question;
pub mod crawl_tables;
pub mod refine_answer;
pub mod run_agent;

pub use ask_question::{AskQuestionError, AskQuestionHandler};
pub use crawl_tables::{CrawlError, CrawlSummary, CrawlTablesHandler};
pub use refine_answer::AnswerRefiner;
pub use run_agent::{AgentRunError, AgentRunner};
