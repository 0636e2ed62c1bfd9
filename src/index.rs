//! Per-kind resource indices and the identity collision policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SysGraphError};
use crate::types::{Resource, ResourceKind};

/// What happens when two elements produce the same index key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later element replaces the earlier one.
    #[default]
    LastWriteWins,
    /// The earlier element is kept and the later one discarded.
    FirstWriteWins,
    /// The run fails.
    Reject,
}

#[allow(clippy::should_implement_trait)]
impl CollisionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionPolicy::LastWriteWins => "last_write_wins",
            CollisionPolicy::FirstWriteWins => "first_write_wins",
            CollisionPolicy::Reject => "reject",
        }
    }

    pub fn from_str(s: &str) -> Option<CollisionPolicy> {
        match s {
            "last_write_wins" => Some(CollisionPolicy::LastWriteWins),
            "first_write_wins" => Some(CollisionPolicy::FirstWriteWins),
            "reject" => Some(CollisionPolicy::Reject),
            _ => None,
        }
    }
}

/// A recorded identity collision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub kind: ResourceKind,
    pub key: String,
    /// Source id of the resource left in the index.
    pub kept: String,
    /// Source id of the resource that lost.
    pub discarded: String,
}

/// Builds the index key `scope/segment/identity`.
pub fn index_key(scope: &str, kind: ResourceKind, identity: &str) -> String {
    format!("{}/{}/{}", scope, kind.as_str(), identity)
}

/// Resources of one kind keyed by index key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceIndex {
    entries: BTreeMap<String, Resource>,
}

impl ResourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `resource` under `key`, applying `policy` if the key is taken.
    ///
    /// Returns the collision, if there was one. Re-inserting a resource for
    /// the same source element is a plain replacement, not a collision.
    pub fn insert(
        &mut self,
        key: String,
        resource: Resource,
        policy: CollisionPolicy,
    ) -> Result<Option<Collision>> {
        let Some(existing) = self.entries.get(&key) else {
            self.entries.insert(key, resource);
            return Ok(None);
        };
        if existing.source_id == resource.source_id {
            self.entries.insert(key, resource);
            return Ok(None);
        }

        let existing_id = existing.source_id.clone();
        match policy {
            CollisionPolicy::Reject => Err(SysGraphError::IdentityCollision {
                key,
                existing: existing_id,
                incoming: resource.source_id,
            }),
            CollisionPolicy::FirstWriteWins => Ok(Some(Collision {
                kind: resource.kind,
                key,
                kept: existing_id,
                discarded: resource.source_id,
            })),
            CollisionPolicy::LastWriteWins => {
                let collision = Collision {
                    kind: resource.kind,
                    key: key.clone(),
                    kept: resource.source_id.clone(),
                    discarded: existing_id,
                };
                self.entries.insert(key, resource);
                Ok(Some(collision))
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Resource> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Resource> {
        self.entries.get_mut(key)
    }

    /// Resources in key order.
    pub fn values(&self) -> impl Iterator<Item = &Resource> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Resource)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One [`ResourceIndex`] per indexed kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indices {
    by_kind: BTreeMap<ResourceKind, ResourceIndex>,
}

impl Default for Indices {
    fn default() -> Self {
        Self::new()
    }
}

impl Indices {
    /// Creates an empty index for every indexed kind.
    pub fn new() -> Self {
        let by_kind = ResourceKind::INDEXED
            .iter()
            .map(|kind| (*kind, ResourceIndex::new()))
            .collect();
        Self { by_kind }
    }

    /// Index of `kind`. `Unknown` has none.
    pub fn get(&self, kind: ResourceKind) -> Option<&ResourceIndex> {
        self.by_kind.get(&kind)
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> Option<&mut ResourceIndex> {
        self.by_kind.get_mut(&kind)
    }

    /// Looks up a resource by kind and index key.
    pub fn lookup(&self, kind: ResourceKind, key: &str) -> Option<&Resource> {
        self.get(kind).and_then(|index| index.get(key))
    }

    /// Inserts into the index of `resource.kind`.
    pub fn insert(
        &mut self,
        key: String,
        resource: Resource,
        policy: CollisionPolicy,
    ) -> Result<Option<Collision>> {
        let kind = resource.kind;
        let index = self.by_kind.get_mut(&kind).ok_or_else(|| SysGraphError::Model {
            message: format!("kind '{}' has no index (key '{}')", kind.as_str(), key),
        })?;
        index.insert(key, resource, policy)
    }

    /// Every index, in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &ResourceIndex)> {
        self.by_kind.iter().map(|(kind, index)| (*kind, index))
    }

    /// Every resource of every kind.
    pub fn values(&self) -> impl Iterator<Item = &Resource> {
        self.by_kind.values().flat_map(ResourceIndex::values)
    }

    pub fn total_len(&self) -> usize {
        self.by_kind.values().map(ResourceIndex::len).sum()
    }
}
