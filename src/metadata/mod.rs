//! Metadata statements and their results.
//!
//! - `sql` - Builds the `show` / `describe` / DDL statements
//! - `parse` - Turns textual statement output into names, kinds and columns
//! - `catalog` - Catalog records and their Arrow batch

pub mod catalog;
pub mod parse;
pub mod sql;

pub use catalog::{CatalogRow, CatalogTable, CATALOG_COLUMNS};
pub use parse::{is_view_ddl, parse_describe, Column};
pub use sql::SqlCommandBuilder;
