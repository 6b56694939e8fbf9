pub mod edge;
pub mod entity;
pub mod ingest;
pub mod issue;
pub mod node_id;

pub use edge::{Edge, RelationKind, Weight};
pub use entity::{Entity, StructuralRelation};
pub use ingest::IngestRecord;
pub use issue::{Issue, IssueStatus};
pub use node_id::NodeId;
