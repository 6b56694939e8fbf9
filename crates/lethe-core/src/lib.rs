//! # lethe-core
//!
//! Foundation crate for the Lethe retrieval engine.
//! Defines the graph data model, query and result types, traits for the
//! external collaborators (similarity, query encoding, term weighting),
//! errors, config, and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod graph;
pub mod query;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{LetheConfig, RetrievalMode};
pub use errors::{LetheError, LetheResult};
pub use graph::{
    Edge, Entity, IngestRecord, Issue, IssueStatus, NodeId, RelationKind, StructuralRelation, Weight,
};
pub use query::{
    Candidate, EngineKind, EngineOutput, EngineQuery, FusionPolicy, QueryType, RankedResult,
};
