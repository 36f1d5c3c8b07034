//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - OpenAI completion and embedding providers
//! - `pinecone` - Pinecone vector index
//! - `redshift` - Redshift warehouse over the PostgreSQL wire protocol
//! - `http` - REST API surface

pub mod ai;
pub mod http;
pub mod pinecone;
pub mod redshift;
