use serde::{Deserialize, Serialize};

use super::{NodeId, RelationKind};

/// A structural relation declared on an entity record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuralRelation {
    /// Raw id of the target entity.
    pub target: String,
    pub kind: RelationKind,
}

/// A structural-model element (wall, door, storey, ...).
///
/// Immutable after ingestion. A later insert with the same id replaces
/// `category` and `name` only; relations already materialised stay as they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entity {
    /// Global unique id (typically a 22-character IFC GUID).
    pub id: String,
    /// Category / type tag, e.g. `IfcWall`.
    pub category: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relations: Vec<StructuralRelation>,
}

impl Entity {
    pub fn new(id: impl Into<String>, category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            name: name.into(),
            relations: Vec::new(),
        }
    }

    pub fn with_relation(mut self, target: impl Into<String>, kind: RelationKind) -> Self {
        self.relations.push(StructuralRelation {
            target: target.into(),
            kind,
        });
        self
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::entity(&self.id)
    }
}
