//! Result-set rendering for agent-facing query output.
//!
//! The agent reads query results as plain text, so rows render as a
//! list of tuples: `[(22, 'Bob'), (7, 'Ada')]`. Strings are single
//! quoted, NULLs are spelled out, and values decode by the column's
//! declared type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::BigDecimal;
use sqlx::{Column, Row, TypeInfo};
use std::fmt;

const NULL: &str = "NULL";

/// Renders a full result set.
pub fn render_rows(rows: &[PgRow]) -> String {
    let tuples = rows
        .iter()
        .map(|row| (0..row.len()).map(|i| render_value(row, i)).collect())
        .collect();
    join_tuples(tuples)
}

fn join_tuples(tuples: Vec<Vec<String>>) -> String {
    let rendered: Vec<String> = tuples
        .into_iter()
        .map(|values| format!("({})", values.join(", ")))
        .collect();
    format!("[{}]", rendered.join(", "))
}

fn render_value(row: &PgRow, index: usize) -> String {
    let type_name = row.column(index).type_info().name().to_string();

    match type_name.as_str() {
        "VARCHAR" | "TEXT" | "BPCHAR" | "CHAR" | "NAME" => render_text(row, index),
        "INT2" => render_as::<i16>(row, index),
        "INT4" => render_as::<i32>(row, index),
        "INT8" => render_as::<i64>(row, index),
        "FLOAT4" => render_as::<f32>(row, index),
        "FLOAT8" => render_as::<f64>(row, index),
        "NUMERIC" => render_as::<BigDecimal>(row, index),
        "BOOL" => render_as::<bool>(row, index),
        "DATE" => render_as::<NaiveDate>(row, index),
        "TIMESTAMP" => render_as::<NaiveDateTime>(row, index),
        "TIMESTAMPTZ" => render_as::<DateTime<Utc>>(row, index),
        // Unknown types: fall back to a text decode, then a placeholder
        _ => match row.try_get::<Option<String>, _>(index) {
            Ok(Some(v)) => quote_str(&v),
            Ok(None) => NULL.to_string(),
            Err(_) => format!("<{}>", type_name),
        },
    }
}

fn render_text(row: &PgRow, index: usize) -> String {
    match row.try_get::<Option<String>, _>(index) {
        Ok(Some(v)) => quote_str(&v),
        Ok(None) => NULL.to_string(),
        Err(_) => "?".to_string(),
    }
}

fn render_as<'r, T>(row: &'r PgRow, index: usize) -> String
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + fmt::Display,
{
    match row.try_get::<Option<T>, _>(index) {
        Ok(Some(value)) => value.to_string(),
        Ok(None) => NULL.to_string(),
        Err(_) => "?".to_string(),
    }
}

fn quote_str(v: &str) -> String {
    format!("'{}'", v.replace('\'', "''"))
}
