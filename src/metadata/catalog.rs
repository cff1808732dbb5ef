//! Catalog records and their Arrow representation.

use crate::error::HiveResult;
use crate::metadata::parse::Column;
use crate::relation::RelationType;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow_array::{ArrayRef, Int32Array, RecordBatch, StringArray};
use std::sync::Arc;

/// Column names of the catalog table, in order.
pub const CATALOG_COLUMNS: [&str; 9] = [
    "table_schema",
    "table_name",
    "table_type",
    "table_comment",
    "table_owner",
    "column_name",
    "column_index",
    "column_type",
    "column_comment",
];

/// One column of one relation.
///
/// Hive does not expose table comments or owners here, so those fields
/// are always `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub table_schema: String,
    pub table_name: String,
    pub table_type: RelationType,
    pub table_comment: Option<String>,
    pub table_owner: Option<String>,
    pub column_name: String,
    /// 1-based position within the table
    pub column_index: i32,
    pub column_type: String,
    pub column_comment: Option<String>,
}

/// Catalog records accumulated over a scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTable {
    rows: Vec<CatalogRow>,
}

impl CatalogTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record per column of a table, numbering from 1.
    pub fn push_table(
        &mut self,
        schema: &str,
        table: &str,
        table_type: RelationType,
        columns: Vec<Column>,
    ) {
        for (position, column) in columns.into_iter().enumerate() {
            self.rows.push(CatalogRow {
                table_schema: schema.to_string(),
                table_name: table.to_string(),
                table_type,
                table_comment: None,
                table_owner: None,
                column_name: column.name,
                column_index: position as i32 + 1,
                column_type: column.data_type,
                column_comment: column.comment,
            });
        }
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Arrow schema of [`CatalogTable::to_record_batch`].
    pub fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("table_schema", DataType::Utf8, false),
            Field::new("table_name", DataType::Utf8, false),
            Field::new("table_type", DataType::Utf8, false),
            Field::new("table_comment", DataType::Utf8, true),
            Field::new("table_owner", DataType::Utf8, true),
            Field::new("column_name", DataType::Utf8, false),
            Field::new("column_index", DataType::Int32, false),
            Field::new("column_type", DataType::Utf8, false),
            Field::new("column_comment", DataType::Utf8, true),
        ]))
    }

    /// Convert the records into a single Arrow batch.
    pub fn to_record_batch(&self) -> HiveResult<RecordBatch> {
        let strings = |f: fn(&CatalogRow) -> &str| -> ArrayRef {
            Arc::new(StringArray::from(self.rows.iter().map(f).collect::<Vec<_>>()))
        };
        let optional = |f: fn(&CatalogRow) -> Option<&str>| -> ArrayRef {
            Arc::new(StringArray::from(self.rows.iter().map(f).collect::<Vec<_>>()))
        };
        let table_types: Vec<String> = self
            .rows
            .iter()
            .map(|row| row.table_type.to_string())
            .collect();

        let columns: Vec<ArrayRef> = vec![
            strings(|row| row.table_schema.as_str()),
            strings(|row| row.table_name.as_str()),
            Arc::new(StringArray::from(table_types)),
            optional(|row| row.table_comment.as_deref()),
            optional(|row| row.table_owner.as_deref()),
            strings(|row| row.column_name.as_str()),
            Arc::new(Int32Array::from(
                self.rows.iter().map(|row| row.column_index).collect::<Vec<_>>(),
            )),
            strings(|row| row.column_type.as_str()),
            optional(|row| row.column_comment.as_deref()),
        ];

        Ok(RecordBatch::try_new(Self::schema(), columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::Array;

    fn column(name: &str, data_type: &str) -> Column {
        Column {
            name: name.to_string(),
            data_type: data_type.to_string(),
            comment: None,
        }
    }

    #[test]
    fn test_column_index_resets_per_table() {
        let mut catalog = CatalogTable::new();
        catalog.push_table(
            "default",
            "t1",
            RelationType::Table,
            vec![column("id", "int"), column("name", "string")],
        );
        catalog.push_table("default", "v1", RelationType::View, vec![column("id", "int")]);

        let indexes: Vec<i32> = catalog.rows().iter().map(|r| r.column_index).collect();
        assert_eq!(indexes, vec![1, 2, 1]);
        assert!(catalog.rows().iter().all(|r| r.table_owner.is_none()));
    }

    #[test]
    fn test_to_record_batch() {
        let mut catalog = CatalogTable::new();
        catalog.push_table(
            "default",
            "t1",
            RelationType::Table,
            vec![
                Column {
                    name: "id".to_string(),
                    data_type: "int".to_string(),
                    comment: Some("key".to_string()),
                },
                column("name", "string"),
            ],
        );

        let batch = catalog.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), CATALOG_COLUMNS.len());

        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, CATALOG_COLUMNS.to_vec());

        let comments = batch
            .column(8)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(comments.value(0), "key");
        assert!(comments.is_null(1));

        let types = batch
            .column(2)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(types.value(0), "table");
    }

    #[test]
    fn test_empty_catalog_batch() {
        let batch = CatalogTable::new().to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 0);
    }
}
