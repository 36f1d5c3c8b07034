//! Foreign-key DDL parsing.
//!
//! Redshift's `admin.v_generate_tbl_ddl` view emits foreign keys as
//! `ALTER TABLE ... ADD FOREIGN KEY (...) REFERENCES ...` statements.
//! This module extracts the relationship from that one statement shape.

use once_cell::sync::Lazy;
use regex::Regex;

use super::metadata::ForeignKey;

static FOREIGN_KEY_DDL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)ALTER\s+TABLE\s+(\w+)\.(\w+)\s+ADD\s+FOREIGN\s+KEY\s+\((\w+)\)\s+REFERENCES\s+(\w+)\.(\w+)\((\w+)\)",
    )
    .expect("foreign key DDL regex is valid")
});

/// DDL text that does not match the foreign-key statement grammar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("could not parse foreign key constraint from DDL: {ddl}")]
pub struct ConstraintParseError {
    pub ddl: String,
}

/// Parse one `ALTER TABLE ... ADD FOREIGN KEY` statement.
///
/// The constraint name is not part of this statement shape; callers fill
/// it in later from `information_schema.table_constraints`.
///
/// # Errors
///
/// Returns [`ConstraintParseError`] when any component of the statement
/// is missing or malformed; there is no partial result.
pub fn parse_foreign_key_ddl(ddl: &str) -> Result<ForeignKey, ConstraintParseError> {
    let captures = FOREIGN_KEY_DDL_RE
        .captures(ddl)
        .ok_or_else(|| ConstraintParseError {
            ddl: ddl.to_string(),
        })?;

    Ok(ForeignKey {
        column: captures[3].to_string(),
        constraint_name: None,
        ref_schema: captures[4].to_string(),
        ref_table: captures[5].to_string(),
        ref_column: captures[6].to_string(),
    })
}
