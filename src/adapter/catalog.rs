//! Catalog walking: schemas, relations and columns.

use super::{HiveAdapter, Manifest};
use crate::error::{ErrorKind, HiveResult};
use crate::metadata::parse::{parse_describe, parse_names, relation_type_from_ddl};
use crate::metadata::{CatalogTable, Column, SqlCommandBuilder};
use crate::relation::{Relation, RelationType};
use tracing::{debug, warn};

impl HiveAdapter {
    /// Names of all databases.
    pub async fn list_schemas(&mut self, name: Option<&str>) -> HiveResult<Vec<String>> {
        let data = self.fetch(&SqlCommandBuilder::show_databases(), name).await?;
        Ok(parse_names(&data))
    }

    /// Check whether a database exists (exact, case-sensitive match).
    pub async fn check_schema_exists(&mut self, schema: &str, name: Option<&str>) -> HiveResult<bool> {
        Ok(self
            .list_schemas(name)
            .await?
            .iter()
            .any(|existing| existing == schema))
    }

    /// Relations of a schema, each classified as a table or a view from its DDL.
    ///
    /// When the relation cache is enabled every listed relation is added to it.
    pub async fn list_relations(&mut self, schema: &str, name: Option<&str>) -> HiveResult<Vec<Relation>> {
        let tables = self.list_table_names(schema, name).await?;

        let mut relations = Vec::with_capacity(tables.len());
        for table in tables {
            let kind = self.relation_type(schema, &table, name).await?;
            relations.push(Relation::new(Some(schema), table).with_type(kind));
        }

        if self.config.use_cache {
            for relation in &relations {
                self.cache.add(relation.clone());
            }
        }

        Ok(relations)
    }

    /// Columns of a relation, from `describe`.
    pub async fn get_columns_in_relation(
        &mut self,
        relation: &Relation,
        name: Option<&str>,
    ) -> HiveResult<Vec<Column>> {
        let data = self.fetch(&SqlCommandBuilder::describe(relation), name).await?;
        Ok(parse_describe(&data))
    }

    /// Column-level catalog of every schema the manifest uses.
    ///
    /// Schemas missing from the database are skipped. A table whose DDL or
    /// columns cannot be read is logged and skipped; the scan continues.
    ///
    /// # Errors
    ///
    /// Failures to list databases or the tables of a schema abort the scan,
    /// as do cancellation, poll timeouts and connection failures on any table.
    pub async fn get_catalog(&mut self, manifest: &Manifest) -> HiveResult<CatalogTable> {
        let existing = self.list_schemas(None).await?;
        let mut catalog = CatalogTable::new();

        for used in manifest.used_schemas() {
            let Some(schema) = existing
                .iter()
                .find(|s| s.eq_ignore_ascii_case(&used))
                .cloned()
            else {
                debug!("Schema '{}' does not exist, skipping", used);
                continue;
            };

            for table in self.list_table_names(&schema, None).await? {
                match self.table_columns(&schema, &table).await {
                    Ok((kind, columns)) => catalog.push_table(&schema, &table, kind, columns),
                    Err(e) if e.kind() == ErrorKind::Database => warn!(
                        "Skipping {}.{} in catalog, could not read its metadata: {}",
                        schema, table, e
                    ),
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(catalog)
    }

    async fn list_table_names(&mut self, schema: &str, name: Option<&str>) -> HiveResult<Vec<String>> {
        let data = self.fetch(&SqlCommandBuilder::show_tables(schema), name).await?;
        Ok(parse_names(&data))
    }

    async fn relation_type(
        &mut self,
        schema: &str,
        table: &str,
        name: Option<&str>,
    ) -> HiveResult<RelationType> {
        let data = self
            .fetch(&SqlCommandBuilder::show_create_table(schema, table), name)
            .await?;
        Ok(relation_type_from_ddl(&data))
    }

    async fn table_columns(&mut self, schema: &str, table: &str) -> HiveResult<(RelationType, Vec<Column>)> {
        let kind = self.relation_type(schema, table, None).await?;
        let relation = Relation::new(Some(schema), table).with_type(kind);
        let columns = self.get_columns_in_relation(&relation, None).await?;
        Ok((kind, columns))
    }
}
