//! Table metadata assembled from the warehouse catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `schema.table` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Error for a table reference that is not of the form `schema.table`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("table reference must be of the form schema.table, got: {0}")]
pub struct InvalidTableRef(pub String);

impl FromStr for TableRef {
    type Err = InvalidTableRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((schema, table))
                if !schema.is_empty() && !table.is_empty() && !table.contains('.') =>
            {
                Ok(Self::new(schema, table))
            }
            _ => Err(InvalidTableRef(s.to_string())),
        }
    }
}

/// One column of a table, with its catalog description if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub description: String,
    pub data_type: String,
}

/// The table's primary key constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub column: String,
    pub constraint_name: String,
}

/// One foreign key relationship of the table.
///
/// The constraint name is absent when the key was parsed from DDL and
/// has not yet been matched to its catalog constraint entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column: String,
    pub constraint_name: Option<String>,
    pub ref_schema: String,
    pub ref_table: String,
    pub ref_column: String,
}

/// Everything the crawler learns about one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub schema: String,
    pub table: String,
    pub description: String,
    pub primary_key: Option<PrimaryKey>,
    pub foreign_keys: Vec<ForeignKey>,
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(self.schema.clone(), self.table.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_ref_parses_schema_and_table() {
        let table_ref: TableRef = "lrt_demo.dm_sales".parse().unwrap();
        assert_eq!(table_ref.schema, "lrt_demo");
        assert_eq!(table_ref.table, "dm_sales");
        assert_eq!(table_ref.to_string(), "lrt_demo.dm_sales");
    }

    #[test]
    fn table_ref_rejects_missing_parts() {
        assert!("dm_sales".parse::<TableRef>().is_err());
        assert!(".dm_sales".parse::<TableRef>().is_err());
        assert!("lrt_demo.".parse::<TableRef>().is_err());
        assert!("a.b.c".parse::<TableRef>().is_err());
    }

    #[test]
    fn invalid_ref_error_names_the_input() {
        let err = "justatable".parse::<TableRef>().unwrap_err();
        assert!(err.to_string().contains("justatable"));
    }
}
