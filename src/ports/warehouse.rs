//! Warehouse Port - Interface to the Redshift warehouse.
//!
//! Covers both faces of the warehouse: the execution target for agent
//! SQL (validate, run) and the catalog service the crawler reads table
//! metadata from.

use async_trait::async_trait;

use crate::domain::catalog::{ConstraintParseError, TableMetadata, TableRef};

/// Port for warehouse access.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Check that a statement is valid without executing it.
    ///
    /// Surfaces syntax and semantic errors (missing tables, bad casts)
    /// while never running the statement, so even a smuggled DML
    /// statement cannot change data here.
    async fn validate_query(&self, query: &str) -> Result<(), WarehouseError>;

    /// Execute a statement and render the full result set as text.
    async fn run_query(&self, query: &str) -> Result<String, WarehouseError>;

    /// Assemble catalog metadata for one table.
    async fn table_metadata(&self, table: &TableRef) -> Result<TableMetadata, WarehouseError>;
}

/// Warehouse errors.
#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    /// The warehouse rejected the statement.
    #[error("{0}")]
    QueryFailed(String),

    /// Could not reach the warehouse or acquire a connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Foreign-key DDL from the catalog could not be parsed.
    #[error("constraint parsing failed: {0}")]
    Constraint(#[from] ConstraintParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::parse_foreign_key_ddl;

    #[test]
    fn query_failures_surface_the_detail_verbatim() {
        let err = WarehouseError::QueryFailed("relation \"nope\" does not exist".to_string());
        assert_eq!(err.to_string(), "relation \"nope\" does not exist");
    }

    #[test]
    fn constraint_errors_convert() {
        let parse_err = parse_foreign_key_ddl("not ddl").unwrap_err();
        let err: WarehouseError = parse_err.into();
        assert!(err.to_string().contains("constraint parsing failed"));
    }
}
