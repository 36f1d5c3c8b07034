//! Application layer - Handlers and agent tooling.
//!
//! This layer orchestrates domain operations and coordinates between
//! ports: the agent loop, the refinement pass, the question flow, and
//! the catalog crawl.

pub mod handlers;
pub mod tools;

pub use handlers::{
    AgentRunError, AgentRunner, AnswerRefiner, AskQuestionError, AskQuestionHandler, CrawlError,
    CrawlSummary, CrawlTablesHandler,
};
pub use tools::{warehouse_tools, RunQueryTool, ValidateQueryTool};
