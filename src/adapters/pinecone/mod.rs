//! Pinecone adapter - semantic index over Pinecone's REST data plane.

mod index;

pub use index::{PineconeConfig, PineconeIndex};
