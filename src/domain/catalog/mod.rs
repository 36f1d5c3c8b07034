//! Catalog domain
//!
//! Types describing warehouse tables as assembled from the Redshift
//! catalog, the foreign-key DDL grammar, and the context documents the
//! crawler derives from them for semantic retrieval.

pub mod constraint;
pub mod document;
pub mod metadata;

pub use constraint::{parse_foreign_key_ddl, ConstraintParseError};
pub use document::{describe_table, render_assumption_prompt, ContextDocument, DocumentMetadata};
pub use metadata::{
    ColumnMetadata, ForeignKey, InvalidTableRef, PrimaryKey, TableMetadata, TableRef,
};
