//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CompletionModel` - Text completion provider (agent loop, refiner, crawler)
//! - `EmbeddingModel` - Batch text embedding provider
//! - `SemanticIndex` - Vector similarity index over context documents
//! - `Warehouse` - Redshift access: SQL validation/execution and catalog metadata

mod completion_model;
mod embedding_model;
mod semantic_index;
mod warehouse;

pub use completion_model::{
    Completion, CompletionError, CompletionModel, CompletionRequest, FinishReason, TokenUsage,
};
pub use embedding_model::{EmbeddingError, EmbeddingModel};
pub use semantic_index::{IndexError, SemanticIndex};
pub use warehouse::{Warehouse, WarehouseError};
