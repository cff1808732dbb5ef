//! SQL command builder for metadata and DDL statements.
//!
//! Identifiers passed as plain names are backtick-quoted; relations render
//! themselves according to their own quote and include policies.

use crate::error::{HiveError, HiveResult};
use crate::relation::{quote_identifier, Relation, RelationType};

/// Builds the statements the adapter sends to Hive.
pub struct SqlCommandBuilder;

impl SqlCommandBuilder {
    /// Build `show databases`.
    pub fn show_databases() -> String {
        "show databases".to_string()
    }

    /// Build `show tables in `{schema}``.
    pub fn show_tables(schema: &str) -> String {
        format!("show tables in {}", quote_identifier(schema))
    }

    /// Build `show create table `{schema}`.`{table}``.
    pub fn show_create_table(schema: &str, table: &str) -> String {
        format!(
            "show create table {}.{}",
            quote_identifier(schema),
            quote_identifier(table)
        )
    }

    /// Build `describe {relation}`.
    pub fn describe(relation: &Relation) -> String {
        format!("describe {}", relation)
    }

    /// Build `drop {kind} if exists {relation}`.
    ///
    /// # Errors
    ///
    /// Returns `HiveError::Compiler` if the relation has no kind.
    pub fn drop_relation(relation: &Relation) -> HiveResult<String> {
        let kind = Self::require_kind(relation, "drop")?;
        Ok(format!("drop {} if exists {}", kind.sql_keyword(), relation))
    }

    /// Build `alter {kind} {from} rename to {to}`, with the target rendered
    /// without its schema.
    ///
    /// # Errors
    ///
    /// Returns `HiveError::Compiler` if the source relation has no kind.
    pub fn rename_relation(from: &Relation, to: &Relation) -> HiveResult<String> {
        let kind = Self::require_kind(from, "rename")?;
        Ok(format!(
            "alter {} {} rename to {}",
            kind.sql_keyword(),
            from,
            to.include(false, true)
        ))
    }

    /// Build `truncate table {relation}`.
    pub fn truncate_relation(relation: &Relation) -> String {
        format!("truncate table {}", relation)
    }

    /// Build `create schema if not exists `{schema}``.
    pub fn create_schema(schema: &str) -> String {
        format!("create schema if not exists {}", quote_identifier(schema))
    }

    /// Build `drop schema if exists `{schema}` cascade`.
    pub fn drop_schema(schema: &str) -> String {
        format!("drop schema if exists {} cascade", quote_identifier(schema))
    }

    fn require_kind(relation: &Relation, action: &str) -> HiveResult<RelationType> {
        relation.kind().ok_or_else(|| {
            HiveError::Compiler(format!(
                "Tried to {} relation {}, but its type is null.",
                action, relation
            ))
        })
    }
}
