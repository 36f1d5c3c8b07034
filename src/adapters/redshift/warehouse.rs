//! Redshift Warehouse - sqlx implementation of the Warehouse port.
//!
//! Validation prepares the statement server side without executing it,
//! so the warehouse reports syntax and semantic errors while data stays
//! untouched. Metadata assembly stitches together four catalog reads:
//! columns, the table comment, foreign-key DDL from the admin view, and
//! the constraint listing that names keys.

use async_trait::async_trait;
use sqlx::error::DatabaseError;
use sqlx::{Executor, PgPool};

use crate::domain::catalog::{
    parse_foreign_key_ddl, ColumnMetadata, ForeignKey, PrimaryKey, TableMetadata, TableRef,
};
use crate::ports::{Warehouse, WarehouseError};

use super::rows::render_rows;

/// Redshift access through a postgres connection pool.
#[derive(Clone)]
pub struct RedshiftWarehouse {
    pool: PgPool,
}

impl RedshiftWarehouse {
    /// Creates a new warehouse over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Columns with their catalog descriptions and type names.
    async fn fetch_columns(&self, table: &TableRef) -> Result<Vec<ColumnMetadata>, WarehouseError> {
        let rows: Vec<(String, Option<String>, Option<String>)> = sqlx::query_as(
            r#"
            SELECT att.attname, des.description, ty.typname
            FROM pg_catalog.pg_attribute att
            LEFT JOIN pg_catalog.pg_description des
                   ON att.attrelid = des.objoid AND att.attnum = des.objsubid
            LEFT JOIN pg_type ty ON ty.oid = att.atttypid
            LEFT JOIN pg_class cl ON cl.oid = att.attrelid
            LEFT JOIN pg_catalog.pg_namespace ns ON ns.oid = cl.relnamespace
            WHERE att.attnum > 0
              AND cl.relname = $1
              AND ns.nspname = $2
            ORDER BY att.attnum
            "#,
        )
        .bind(&table.table)
        .bind(&table.schema)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|(name, description, data_type)| ColumnMetadata {
                name,
                description: description.unwrap_or_default(),
                data_type: data_type.unwrap_or_default(),
            })
            .collect())
    }

    /// The table comment, empty when none is set.
    async fn fetch_description(&self, table: &TableRef) -> Result<String, WarehouseError> {
        let row: (Option<String>,) = sqlx::query_as("SELECT obj_description($1::regclass)")
            .bind(table.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.0.map(|d| d.trim().to_string()).unwrap_or_default())
    }

    /// Foreign keys parsed out of the generated DDL.
    ///
    /// Redshift's information_schema does not expose referenced tables,
    /// so relationships come from the `admin.v_generate_tbl_ddl` view.
    async fn fetch_foreign_keys(
        &self,
        table: &TableRef,
    ) -> Result<Vec<ForeignKey>, WarehouseError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT ddl FROM admin.v_generate_tbl_ddl
            WHERE schemaname = $1 AND tablename = $2 AND ddl LIKE '%FOREIGN KEY%'
            "#,
        )
        .bind(&table.schema)
        .bind(&table.table)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|(ddl,)| parse_foreign_key_ddl(ddl).map_err(WarehouseError::from))
            .collect()
    }

    /// Constraint listing: (constraint_name, column_name, constraint_type).
    async fn fetch_constraints(
        &self,
        table: &TableRef,
    ) -> Result<Vec<(String, Option<String>, String)>, WarehouseError> {
        sqlx::query_as(
            r#"
            SELECT a.constraint_name, b.column_name, a.constraint_type
            FROM information_schema.table_constraints a
            LEFT JOIN information_schema.key_column_usage b
                   ON b.table_schema = a.table_schema
                  AND b.table_name = a.table_name
                  AND b.constraint_name = a.constraint_name
            WHERE a.table_schema = $1 AND a.table_name = $2
            "#,
        )
        .bind(&table.schema)
        .bind(&table.table)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl Warehouse for RedshiftWarehouse {
    async fn validate_query(&self, query: &str) -> Result<(), WarehouseError> {
        self.pool.prepare(query).await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn run_query(&self, query: &str) -> Result<String, WarehouseError> {
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(render_rows(&rows))
    }

    async fn table_metadata(&self, table: &TableRef) -> Result<TableMetadata, WarehouseError> {
        let columns = self.fetch_columns(table).await?;
        let description = self.fetch_description(table).await?;
        let mut foreign_keys = self.fetch_foreign_keys(table).await?;
        let constraint_rows = self.fetch_constraints(table).await?;
        let primary_key = apply_constraints(constraint_rows, &mut foreign_keys);

        Ok(TableMetadata {
            schema: table.schema.clone(),
            table: table.table.clone(),
            description,
            primary_key,
            foreign_keys,
            columns,
        })
    }
}

/// Folds the constraint listing into the metadata: picks out the
/// primary key and backfills constraint names onto foreign keys parsed
/// from DDL, matched by column.
fn apply_constraints(
    rows: Vec<(String, Option<String>, String)>,
    foreign_keys: &mut [ForeignKey],
) -> Option<PrimaryKey> {
    let mut primary_key = None;

    for (constraint_name, column_name, constraint_type) in rows {
        match constraint_type.as_str() {
            "PRIMARY KEY" => {
                if let Some(column) = column_name {
                    primary_key = Some(PrimaryKey {
                        column,
                        constraint_name,
                    });
                }
            }
            "FOREIGN KEY" => {
                if let Some(column) = column_name {
                    if let Some(fk) = foreign_keys.iter_mut().find(|fk| fk.column == column) {
                        fk.constraint_name = Some(constraint_name);
                    }
                }
            }
            _ => {}
        }
    }

    primary_key
}

fn map_sqlx_error(e: sqlx::Error) -> WarehouseError {
    match e {
        sqlx::Error::Database(db) => WarehouseError::QueryFailed(db.message().to_string()),
        sqlx::Error::PoolTimedOut => {
            WarehouseError::Connection("connection pool timed out".to_string())
        }
        sqlx::Error::PoolClosed => WarehouseError::Connection("connection pool closed".to_string()),
        sqlx::Error::Io(e) => WarehouseError::Connection(e.to_string()),
        other => WarehouseError::QueryFailed(other.to_string()),
    }
}
