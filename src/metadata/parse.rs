//! Parsing of Hive metadata statement output.
//!
//! Hive answers metadata statements with plain text rows: one name per row
//! for `show databases` / `show tables`, one DDL line per row for
//! `show create table`, and `(col_name, data_type, comment)` rows for
//! `describe`.

use crate::relation::RelationType;
use crate::transport::{value_as_string, ResultData};

/// A column of a relation as reported by `describe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub comment: Option<String>,
}

/// Names from a single-column listing (`show databases`, `show tables`).
pub fn parse_names(data: &ResultData) -> Vec<String> {
    data.column_strings(0)
}

/// Check whether `show create table` output defines a view.
///
/// The DDL lines are joined with spaces, left-trimmed and lowercased; only
/// text starting with `create view` counts. Variants such as
/// `create or replace view` are classified as tables.
pub fn is_view_ddl(lines: &[String]) -> bool {
    lines
        .join(" ")
        .trim_start()
        .to_lowercase()
        .starts_with("create view")
}

/// Classify a relation from its `show create table` output.
pub fn relation_type_from_ddl(data: &ResultData) -> RelationType {
    if is_view_ddl(&data.column_strings(0)) {
        RelationType::View
    } else {
        RelationType::Table
    }
}

/// Parse `describe` output into columns.
///
/// Parsing stops at the first empty name or `#` section header, which is
/// where Hive starts repeating partition columns.
pub fn parse_describe(data: &ResultData) -> Vec<Column> {
    let mut columns = Vec::new();

    for row in &data.rows {
        let name = row
            .first()
            .and_then(value_as_string)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if name.is_empty() || name.starts_with('#') {
            break;
        }

        let data_type = row
            .get(1)
            .and_then(value_as_string)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let comment = row
            .get(2)
            .and_then(value_as_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        columns.push(Column {
            name,
            data_type,
            comment,
        });
    }

    columns
}
