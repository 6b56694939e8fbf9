use serde::{Deserialize, Serialize};

use super::{Edge, Entity, Issue};

/// One record of the batch ingestion feed.
///
/// Externally tagged: a JSONL line looks like `{"entity": {...}}`,
/// `{"issue": {...}}` or `{"edge": {...}}`. Unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestRecord {
    Entity(Entity),
    Issue(Issue),
    Edge(Edge),
}

impl IngestRecord {
    /// Ingestion phase: entities first, then issues, then edges.
    pub fn phase(&self) -> u8 {
        match self {
            Self::Entity(_) => 0,
            Self::Issue(_) => 1,
            Self::Edge(_) => 2,
        }
    }
}
