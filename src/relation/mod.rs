//! Relations: named tables and views inside a schema.
//!
//! A [`Relation`] renders itself as a backtick-quoted path, e.g.
//! `` `analytics`.`events` ``, subject to its quote and include policies.

pub mod cache;

pub use cache::{InMemoryRelationCache, RelationCache};

use crate::adapter::ManifestNode;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Character used to quote Hive identifiers.
pub const QUOTE_CHARACTER: char = '`';

/// Quote an identifier, doubling any embedded quote character.
pub fn quote_identifier(identifier: &str) -> String {
    let escaped = identifier.replace(QUOTE_CHARACTER, "``");
    format!("{q}{}{q}", escaped, q = QUOTE_CHARACTER)
}

/// Kind of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// Managed table
    Table,
    /// View
    View,
    /// External table
    External,
}

impl RelationType {
    /// Keyword used in DDL statements (`drop table`, `alter view`, ...).
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            RelationType::Table | RelationType::External => "table",
            RelationType::View => "view",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::Table => write!(f, "table"),
            RelationType::View => write!(f, "view"),
            RelationType::External => write!(f, "external"),
        }
    }
}

/// Per-component switch used for quoting and for inclusion in the rendered path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub schema: bool,
    pub identifier: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            schema: true,
            identifier: true,
        }
    }
}

/// A table or view in a Hive database.
///
/// Identity is `(schema, identifier)` compared case-insensitively, the same
/// key the relation cache uses; the kind, table name and policies do not take
/// part in equality.
#[derive(Debug, Clone)]
pub struct Relation {
    schema: Option<String>,
    identifier: String,
    table_name: String,
    kind: Option<RelationType>,
    quote_policy: Policy,
    include_policy: Policy,
}

impl Relation {
    /// Create a relation of unknown kind. The table name defaults to the
    /// identifier.
    pub fn new(schema: Option<&str>, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            schema: schema.map(str::to_string),
            table_name: identifier.clone(),
            identifier,
            kind: None,
            quote_policy: Policy::default(),
            include_policy: Policy::default(),
        }
    }

    /// Build the relation a model node materializes into: its schema and
    /// alias, or its name when the alias is empty.
    pub fn from_node(node: &ManifestNode) -> Self {
        Self::new(Some(node.schema.as_str()), node.relation_name())
    }

    /// Set the relation kind.
    pub fn with_type(mut self, kind: RelationType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the table name when it differs from the identifier.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Set the quote policy.
    pub fn with_quote_policy(mut self, policy: Policy) -> Self {
        self.quote_policy = policy;
        self
    }

    /// Copy of this relation rendering only the selected components.
    pub fn include(&self, schema: bool, identifier: bool) -> Self {
        let mut relation = self.clone();
        relation.include_policy = Policy { schema, identifier };
        relation
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn kind(&self) -> Option<RelationType> {
        self.kind
    }

    pub fn quote_policy(&self) -> Policy {
        self.quote_policy
    }

    pub fn include_policy(&self) -> Policy {
        self.include_policy
    }

    /// Case-insensitive identity, since Hive folds identifiers to lower case.
    /// A missing schema keys like an empty one.
    pub(crate) fn cache_key(&self) -> (String, String) {
        (
            self.schema.as_deref().unwrap_or_default().to_lowercase(),
            self.identifier.to_lowercase(),
        )
    }

    fn render_part(value: &str, quote: bool) -> String {
        if quote {
            quote_identifier(value)
        } else {
            value.to_string()
        }
    }
}

impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        self.cache_key() == other.cache_key()
    }
}

impl Eq for Relation {}

impl Hash for Relation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cache_key().hash(state);
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(2);
        if self.include_policy.schema {
            if let Some(schema) = &self.schema {
                parts.push(Self::render_part(schema, self.quote_policy.schema));
            }
        }
        if self.include_policy.identifier {
            parts.push(Self::render_part(
                &self.identifier,
                self.quote_policy.identifier,
            ));
        }
        write!(f, "{}", parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_quoted_path() {
        let relation = Relation::new(Some("analytics"), "events");
        assert_eq!(relation.to_string(), "`analytics`.`events`");
        assert_eq!(relation.table_name(), "events");
        assert_eq!(relation.kind(), None);
    }

    #[test]
    fn test_render_without_schema() {
        let relation = Relation::new(Some("analytics"), "events").include(false, true);
        assert_eq!(relation.to_string(), "`events`");

        let relation = Relation::new(None, "events");
        assert_eq!(relation.to_string(), "`events`");
    }

    #[test]
    fn test_render_unquoted() {
        let relation = Relation::new(Some("analytics"), "events").with_quote_policy(Policy {
            schema: false,
            identifier: true,
        });
        assert_eq!(relation.to_string(), "analytics.`events`");
    }

    #[test]
    fn test_quote_identifier_escapes_backticks() {
        assert_eq!(quote_identifier("odd`name"), "`odd``name`");
    }

    #[test]
    fn test_identity_ignores_kind() {
        let a = Relation::new(Some("s"), "t").with_type(RelationType::Table);
        let b = Relation::new(Some("s"), "t").with_type(RelationType::View);
        assert_eq!(a, b);
        assert_ne!(a, Relation::new(Some("s"), "u"));
    }

    #[test]
    fn test_identity_matches_cache_key() {
        use std::collections::HashSet;

        let lower = Relation::new(Some("analytics"), "events");
        let upper = Relation::new(Some("Analytics"), "EVENTS");
        assert_eq!(lower, upper);
        assert_eq!(lower.cache_key(), upper.cache_key());

        let set: HashSet<Relation> = [lower, upper].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_relation_type_keywords() {
        assert_eq!(RelationType::View.to_string(), "view");
        assert_eq!(RelationType::External.to_string(), "external");
        assert_eq!(RelationType::External.sql_keyword(), "table");
        assert_eq!(RelationType::View.sql_keyword(), "view");
    }

    #[test]
    fn test_from_node_uses_alias() {
        let node = ManifestNode {
            unique_id: "model.proj.daily_events".to_string(),
            resource_type: "model".to_string(),
            schema: "analytics".to_string(),
            name: "daily_events".to_string(),
            alias: "events_daily".to_string(),
        };
        let relation = Relation::from_node(&node);
        assert_eq!(relation.schema(), Some("analytics"));
        assert_eq!(relation.identifier(), "events_daily");
    }

    #[test]
    fn test_from_node_without_alias_uses_name() {
        let node = ManifestNode {
            unique_id: "model.proj.daily_events".to_string(),
            resource_type: "model".to_string(),
            schema: "analytics".to_string(),
            name: "daily_events".to_string(),
            alias: String::new(),
        };
        let relation = Relation::from_node(&node);
        assert_eq!(relation.identifier(), "daily_events");
        assert_eq!(relation.to_string(), "`analytics`.`daily_events`");
    }
}
