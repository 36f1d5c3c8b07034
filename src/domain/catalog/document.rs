//! Context documents derived from table metadata.
//!
//! The crawler renders each table's metadata into prose a language model
//! can reason over, appends a model-written assumption summary, and
//! stores the result in the semantic index. At question time these
//! documents come back as the schema context for query drafting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metadata::TableMetadata;

/// A unit of retrievable context: rendered text plus the identifying
/// metadata stored alongside the vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Metadata stored with each document in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub table_name: String,
    pub schema_name: String,

    /// Primary key column name, when the table declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,

    pub crawled_at: DateTime<Utc>,
}

impl ContextDocument {
    /// Build the document for a table from its rendered description and
    /// the assumption summary written by the model.
    pub fn from_parts(metadata: &TableMetadata, description: String, assumption: &str) -> Self {
        let text = format!("{description}\n{assumption}\n");
        Self {
            text,
            metadata: DocumentMetadata {
                table_name: metadata.table.clone(),
                schema_name: metadata.schema.clone(),
                primary_key: metadata.primary_key.as_ref().map(|pk| pk.column.clone()),
                crawled_at: Utc::now(),
            },
        }
    }
}

/// Render a table's metadata as prose.
///
/// Sentence by sentence: what the table is, its primary key, one
/// relationship sentence per foreign key, then the column list.
pub fn describe_table(metadata: &TableMetadata) -> String {
    let mut text = format!(
        "Table `{}` in schema `{}` is a table that {}.\n",
        metadata.table, metadata.schema, metadata.description
    );

    if let Some(pk) = &metadata.primary_key {
        text.push_str(&format!(
            "\nThe table has a primary key with column name `{}` and the name of the constraint is `{}` which uniquely identifies each row.\n",
            pk.column, pk.constraint_name
        ));
    }

    for (i, fk) in metadata.foreign_keys.iter().enumerate() {
        let opening = if i == 0 { "\nIt" } else { "It also" };
        let constraint_name = fk.constraint_name.as_deref().unwrap_or("");
        text.push_str(&format!(
            "{opening} maintains a foreign key relationship through the `{}` column, which references the `{}` column in the `{}` table from schema `{}`, the constraint name is `{}`.\n",
            fk.column, fk.ref_column, fk.ref_table, fk.ref_schema, constraint_name
        ));
    }

    text.push_str("\nThe columns in the table are:\n");
    for column in &metadata.columns {
        text.push_str(&format!(
            "- Column name: {}, Description: {}, Type: {}\n",
            column.name, column.description, column.data_type
        ));
    }

    text
}

const ASSUMPTION_TEMPLATE: &str = r#"Given the information about a table in Redshift, write an assumption about the table purpose, and an assumption about its relationships.
Example output:
This table seems or is assumed to be ...
For the relationships, it seems or is assumed to have the following:
- Each transaction (salesid) is associated with a specific list (listid)
- Transactions involve a seller (sellerid) and ...
- Each sale is tied to an event (eventid) and ...

Input:
```
{description}
```"#;

/// Render the prompt asking the model to summarize its assumptions
/// about a table from the rendered description.
pub fn render_assumption_prompt(description: &str) -> String {
    ASSUMPTION_TEMPLATE.replace("{description}", description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::metadata::{ColumnMetadata, ForeignKey, PrimaryKey};

    fn sample_metadata() -> TableMetadata {
        TableMetadata {
            schema: "lrt_demo".to_string(),
            table: "dm_sales".to_string(),
            description: "stores one row per completed ticket sale".to_string(),
            primary_key: Some(PrimaryKey {
                column: "sale_id".to_string(),
                constraint_name: "dm_sales_pkey".to_string(),
            }),
            foreign_keys: vec![
                ForeignKey {
                    column: "route_id".to_string(),
                    constraint_name: Some("dm_sales_route_fk".to_string()),
                    ref_schema: "lrt_demo".to_string(),
                    ref_table: "dm_route".to_string(),
                    ref_column: "route_id".to_string(),
                },
                ForeignKey {
                    column: "event_id".to_string(),
                    constraint_name: None,
                    ref_schema: "lrt_demo".to_string(),
                    ref_table: "dm_event".to_string(),
                    ref_column: "event_id".to_string(),
                },
            ],
            columns: vec![
                ColumnMetadata {
                    name: "sale_id".to_string(),
                    description: "surrogate key".to_string(),
                    data_type: "int8".to_string(),
                },
                ColumnMetadata {
                    name: "amount".to_string(),
                    description: String::new(),
                    data_type: "numeric".to_string(),
                },
            ],
        }
    }

    #[test]
    fn description_opens_with_the_table_sentence() {
        let text = describe_table(&sample_metadata());
        assert!(text.starts_with(
            "Table `dm_sales` in schema `lrt_demo` is a table that stores one row per completed ticket sale.\n"
        ));
    }

    #[test]
    fn primary_key_sentence_names_the_constraint() {
        let text = describe_table(&sample_metadata());
        assert!(text.contains("primary key with column name `sale_id`"));
        assert!(text.contains("the name of the constraint is `dm_sales_pkey`"));
    }

    #[test]
    fn first_relationship_reads_differently_from_the_rest() {
        let text = describe_table(&sample_metadata());
        assert!(text.contains("\nIt maintains a foreign key relationship through the `route_id` column"));
        assert!(text.contains("It also maintains a foreign key relationship through the `event_id` column"));
    }

    #[test]
    fn columns_render_one_per_line() {
        let text = describe_table(&sample_metadata());
        assert!(text.contains("- Column name: sale_id, Description: surrogate key, Type: int8\n"));
        assert!(text.contains("- Column name: amount, Description: , Type: numeric\n"));
    }

    #[test]
    fn missing_primary_key_omits_the_sentence() {
        let mut metadata = sample_metadata();
        metadata.primary_key = None;

        let text = describe_table(&metadata);
        assert!(!text.contains("primary key"));
    }

    #[test]
    fn document_combines_description_and_assumption() {
        let metadata = sample_metadata();
        let description = describe_table(&metadata);
        let doc = ContextDocument::from_parts(
            &metadata,
            description.clone(),
            "Assumption Summary: sales facts joined to routes.",
        );

        assert!(doc.text.starts_with(&description));
        assert!(doc.text.contains("Assumption Summary: sales facts joined to routes."));
        assert_eq!(doc.metadata.table_name, "dm_sales");
        assert_eq!(doc.metadata.schema_name, "lrt_demo");
        assert_eq!(doc.metadata.primary_key.as_deref(), Some("sale_id"));
    }

    #[test]
    fn metadata_serializes_without_absent_primary_key() {
        let mut metadata = sample_metadata();
        metadata.primary_key = None;
        let doc = ContextDocument::from_parts(&metadata, "text".to_string(), "assumption");

        let json = serde_json::to_value(&doc.metadata).unwrap();
        assert!(json.get("primary_key").is_none());
        assert_eq!(json["table_name"], "dm_sales");
    }

    #[test]
    fn assumption_prompt_embeds_the_description() {
        let prompt = render_assumption_prompt("Table `x` holds things.");
        assert!(prompt.contains("```\nTable `x` holds things.\n```"));
    }
}
