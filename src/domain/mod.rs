//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `agent` - Reason/act loop grammar, scratchpad, tool set, prompts
//! - `catalog` - Table metadata, constraint parsing, context documents

pub mod agent;
pub mod catalog;
