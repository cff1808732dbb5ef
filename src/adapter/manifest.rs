//! The subset of a compiled project manifest the adapter reads.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A compiled node (model, seed, snapshot, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestNode {
    pub unique_id: String,
    #[serde(default = "default_resource_type")]
    pub resource_type: String,
    pub schema: String,
    pub name: String,
    /// Relation name in the database; empty means "same as `name`"
    #[serde(default)]
    pub alias: String,
}

impl ManifestNode {
    /// Name of the relation this node materializes into.
    pub fn relation_name(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }
}

/// Nodes keyed by unique id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub nodes: BTreeMap<String, ManifestNode>,
}

impl Manifest {
    /// Parse a manifest, defaulting each node's alias to its name.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut manifest: Manifest = serde_json::from_str(json)?;
        for node in manifest.nodes.values_mut() {
            fill_alias(node);
        }
        Ok(manifest)
    }

    /// Add a node, defaulting its alias to its name.
    pub fn insert(&mut self, mut node: ManifestNode) {
        fill_alias(&mut node);
        self.nodes.insert(node.unique_id.clone(), node);
    }

    /// Schemas any node lives in, lowercased as Hive stores them.
    pub fn used_schemas(&self) -> BTreeSet<String> {
        self.nodes
            .values()
            .map(|node| node.schema.to_lowercase())
            .collect()
    }
}

fn fill_alias(node: &mut ManifestNode) {
    if node.alias.is_empty() {
        node.alias = node.name.clone();
    }
}

fn default_resource_type() -> String {
    "model".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_and_used_schemas() {
        let manifest = Manifest::from_json(
            r#"{
                "nodes": {
                    "model.proj.a": { "unique_id": "model.proj.a", "schema": "Analytics", "name": "a" },
                    "model.proj.b": { "unique_id": "model.proj.b", "schema": "analytics", "name": "b", "alias": "b_v2" },
                    "seed.proj.c": { "unique_id": "seed.proj.c", "resource_type": "seed", "schema": "default", "name": "c" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.nodes["model.proj.a"].alias, "a");
        assert_eq!(manifest.nodes["model.proj.b"].alias, "b_v2");
        assert_eq!(manifest.nodes["seed.proj.c"].resource_type, "seed");

        let schemas: Vec<String> = manifest.used_schemas().into_iter().collect();
        assert_eq!(schemas, vec!["analytics", "default"]);
    }

    #[test]
    fn test_insert_defaults_alias() {
        let mut manifest = Manifest::default();
        manifest.insert(ManifestNode {
            unique_id: "model.proj.orders".to_string(),
            resource_type: "model".to_string(),
            schema: "sales".to_string(),
            name: "orders".to_string(),
            alias: String::new(),
        });
        assert_eq!(manifest.nodes["model.proj.orders"].alias, "orders");
    }

    #[test]
    fn test_relation_name_without_from_json() {
        let manifest: Manifest = serde_json::from_str(
            r#"{ "nodes": { "model.proj.a": { "unique_id": "model.proj.a", "schema": "s", "name": "a" } } }"#,
        )
        .unwrap();
        let node = &manifest.nodes["model.proj.a"];
        assert_eq!(node.alias, "");
        assert_eq!(node.relation_name(), "a");
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::from_json("{}").unwrap();
        assert!(manifest.used_schemas().is_empty());
    }
}
