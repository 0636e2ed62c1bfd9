use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::index::{index_key, Collision, Indices, ResourceIndex};
use crate::types::{MappingStats, Resource, ResourceKind};

/// The finished output of one run: every per-kind index plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGraph {
    scope: String,
    indices: Indices,
    stats: MappingStats,
    collisions: Vec<Collision>,
}

/// Serializable snapshot of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub scope: String,
    pub resources: Vec<Resource>,
    pub stats: MappingStats,
    #[serde(default)]
    pub collisions: Vec<Collision>,
}

impl ResourceGraph {
    pub fn new(
        scope: String,
        indices: Indices,
        stats: MappingStats,
        collisions: Vec<Collision>,
    ) -> Self {
        Self {
            scope,
            indices,
            stats,
            collisions,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Union of every index, in kind then key order.
    pub fn all_resources(&self) -> impl Iterator<Item = &Resource> {
        self.indices.values()
    }

    /// Resources of one kind, in key order.
    pub fn resources_of(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.indices
            .get(kind)
            .into_iter()
            .flat_map(ResourceIndex::values)
    }

    /// Looks up a resource by kind and identity.
    pub fn get(&self, kind: ResourceKind, identity: &str) -> Option<&Resource> {
        self.get_by_key(kind, &index_key(&self.scope, kind, identity))
    }

    pub fn get_by_key(&self, kind: ResourceKind, key: &str) -> Option<&Resource> {
        self.indices.lookup(kind, key)
    }

    /// Looks up the resource created from the source element `source_id`.
    pub fn find_by_source(&self, source_id: &str) -> Option<&Resource> {
        self.all_resources().find(|r| r.source_id == source_id)
    }

    /// Every resource address. Unaddressed resources contribute nothing.
    pub fn addresses(&self) -> BTreeSet<&str> {
        self.all_resources().filter_map(Resource::about).collect()
    }

    pub fn len(&self) -> usize {
        self.indices.total_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    pub fn stats(&self) -> &MappingStats {
        &self.stats
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            scope: self.scope.clone(),
            resources: self.all_resources().cloned().collect(),
            stats: self.stats.clone(),
            collisions: self.collisions.clone(),
        }
    }
}
