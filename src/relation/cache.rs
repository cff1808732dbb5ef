//! Relation cache.
//!
//! The surrounding tool keeps a cache of known relations. The adapter only
//! talks to it through [`RelationCache`]: relations found while listing a
//! schema are added, and entries are renamed or evicted before the matching
//! DDL is sent.

use super::Relation;
use std::collections::HashMap;

/// Mapping from qualified name to relation.
pub trait RelationCache: Send {
    /// Record a relation.
    fn add(&mut self, relation: Relation);

    /// Evict a relation.
    fn evict(&mut self, relation: &Relation);

    /// Move the entry for `from` to `to`, keeping its kind.
    fn rename(&mut self, from: &Relation, to: &Relation);

    /// Look up a relation by schema and identifier.
    fn get(&self, schema: &str, identifier: &str) -> Option<Relation>;

    /// All cached relations of a schema.
    fn relations_in(&self, schema: &str) -> Vec<Relation>;
}

/// Process-local [`RelationCache`].
#[derive(Debug, Default)]
pub struct InMemoryRelationCache {
    relations: HashMap<(String, String), Relation>,
}

impl InMemoryRelationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl RelationCache for InMemoryRelationCache {
    fn add(&mut self, relation: Relation) {
        self.relations.insert(relation.cache_key(), relation);
    }

    fn evict(&mut self, relation: &Relation) {
        self.relations.remove(&relation.cache_key());
    }

    fn rename(&mut self, from: &Relation, to: &Relation) {
        let Some(old) = self.relations.remove(&from.cache_key()) else {
            return;
        };

        let mut renamed = to.clone();
        if renamed.kind().is_none() {
            if let Some(kind) = old.kind() {
                renamed = renamed.with_type(kind);
            }
        }
        self.relations.insert(renamed.cache_key(), renamed);
    }

    fn get(&self, schema: &str, identifier: &str) -> Option<Relation> {
        self.relations
            .get(&(schema.to_lowercase(), identifier.to_lowercase()))
            .cloned()
    }

    fn relations_in(&self, schema: &str) -> Vec<Relation> {
        let schema = schema.to_lowercase();
        let mut relations: Vec<Relation> = self
            .relations
            .iter()
            .filter(|((s, _), _)| *s == schema)
            .map(|(_, relation)| relation.clone())
            .collect();
        relations.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        relations
    }
}
