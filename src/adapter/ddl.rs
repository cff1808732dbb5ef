//! DDL operations on relations and schemas.

use super::HiveAdapter;
use crate::error::{HiveError, HiveResult};
use crate::metadata::SqlCommandBuilder;
use crate::relation::Relation;
use tracing::debug;

impl HiveAdapter {
    /// Drop a relation.
    ///
    /// The cache entry is evicted before the statement is sent.
    ///
    /// # Errors
    ///
    /// Returns `HiveError::Compiler`, without touching the cache or sending
    /// anything, when the relation has no kind.
    pub async fn drop_relation(&mut self, relation: &Relation, name: Option<&str>) -> HiveResult<()> {
        let sql = SqlCommandBuilder::drop_relation(relation)?;
        if self.config.use_cache {
            self.cache.evict(relation);
        }
        self.add_query(&sql, name, &[], false).await?;
        Ok(())
    }

    /// Rename a relation within its schema.
    ///
    /// # Errors
    ///
    /// Returns `HiveError::Compiler` when the source relation has no kind.
    pub async fn rename_relation(
        &mut self,
        from: &Relation,
        to: &Relation,
        name: Option<&str>,
    ) -> HiveResult<()> {
        let sql = SqlCommandBuilder::rename_relation(from, to)?;
        if self.config.use_cache {
            self.cache.rename(from, to);
        }
        self.add_query(&sql, name, &[], true).await?;
        Ok(())
    }

    /// Remove all rows from a table.
    pub async fn truncate_relation(&mut self, relation: &Relation, name: Option<&str>) -> HiveResult<()> {
        self.add_query(&SqlCommandBuilder::truncate_relation(relation), name, &[], true)
            .await?;
        Ok(())
    }

    /// Create a database if it does not exist.
    pub async fn create_schema(&mut self, schema: &str, name: Option<&str>) -> HiveResult<()> {
        debug!("Creating schema \"{}\".", schema);
        self.add_query(&SqlCommandBuilder::create_schema(schema), name, &[], true)
            .await?;
        self.manager.commit_if_has_connection(name).await
    }

    /// Drop a database and everything in it.
    pub async fn drop_schema(&mut self, schema: &str, name: Option<&str>) -> HiveResult<()> {
        debug!("Dropping schema \"{}\".", schema);
        self.add_query(&SqlCommandBuilder::drop_schema(schema), name, &[], true)
            .await?;
        Ok(())
    }

    /// Change a column's type. Hive does not support this.
    ///
    /// # Errors
    ///
    /// Always returns `HiveError::NotImplemented`.
    pub fn alter_column_type(
        &self,
        _relation: &Relation,
        _column_name: &str,
        _new_column_type: &str,
        _name: Option<&str>,
    ) -> HiveResult<()> {
        Err(HiveError::not_implemented("alter_column_type"))
    }
}
