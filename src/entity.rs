//! Domain entities and the read-only entity catalog.
//!
//! Entities (symptoms, diseases, tests, treatments, causes) are identified by
//! an [`EntityId`]. Examples and rules refer to entities by id only, so an
//! entity is stored once in the [`EntityCatalog`] and shared from there.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{InductionError, InductionResult};

/// Identifier of a domain entity, e.g. `fever` or `influenza`.
///
/// Backed by an `Arc<str>`, so cloning an id never copies the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Arc<str>);

impl EntityId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Partition of the catalog an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Symptom,
    Disease,
    Test,
    Treatment,
    Cause,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Symptom,
        EntityKind::Disease,
        EntityKind::Test,
        EntityKind::Treatment,
        EntityKind::Cause,
    ];

    /// Name of the ontology class that declares entities of this kind.
    pub fn class_name(self) -> &'static str {
        match self {
            EntityKind::Symptom => "Symptom",
            EntityKind::Disease => "Disease",
            EntityKind::Test => "Testing",
            EntityKind::Treatment => "Treatment",
            EntityKind::Cause => "Cause",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityKind::Symptom => "symptom",
            EntityKind::Disease => "disease",
            EntityKind::Test => "test",
            EntityKind::Treatment => "treatment",
            EntityKind::Cause => "cause",
        };
        f.write_str(s)
    }
}

/// An immutable, identified domain concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Human-readable label. Falls back to the id when absent.
    pub name: Option<String>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Read-only maps from identifier to entity, partitioned by kind.
///
/// Supplied once per run. The similarity metric normalizes set differences
/// by the size of the matching partition.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    partitions: BTreeMap<EntityKind, BTreeMap<EntityId, Arc<Entity>>>,
}

impl EntityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity. Re-inserting an id replaces the earlier entry.
    pub fn insert(&mut self, entity: Entity) -> Arc<Entity> {
        let entity = Arc::new(entity);
        self.partitions
            .entry(entity.kind)
            .or_default()
            .insert(entity.id.clone(), Arc::clone(&entity));
        entity
    }

    /// Builder-style insert of a bare id.
    pub fn with(mut self, kind: EntityKind, id: &str) -> Self {
        self.insert(Entity::new(id, kind));
        self
    }

    pub fn get(&self, kind: EntityKind, id: &EntityId) -> Option<&Arc<Entity>> {
        self.partitions.get(&kind)?.get(id)
    }

    pub fn contains(&self, kind: EntityKind, id: &EntityId) -> bool {
        self.get(kind, id).is_some()
    }

    /// Look up an entity, failing with [`InductionError::UnknownEntity`].
    pub fn require(&self, kind: EntityKind, id: &EntityId) -> InductionResult<&Arc<Entity>> {
        self.get(kind, id).ok_or_else(|| InductionError::UnknownEntity {
            id: id.to_string(),
            kind: kind.to_string(),
        })
    }

    /// All entities of one kind, ordered by id.
    pub fn entities(&self, kind: EntityKind) -> impl Iterator<Item = &Arc<Entity>> {
        self.partitions
            .get(&kind)
            .into_iter()
            .flat_map(|p| p.values())
    }

    /// Number of entities known for one kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.partitions.get(&kind).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.values().all(BTreeMap::is_empty)
    }
}
