//! # lethe-graph
//!
//! The knowledge-graph store: entities and issues in a petgraph `StableGraph`,
//! an id → index map, a reverse reference index, per-issue atomic access
//! counters, and a lazy breadth-first neighbour iterator.
//!
//! Mutation takes `&mut self` and happens in a single-writer ingestion phase.
//! Queries and `record_access` take `&self` and may run concurrently.

pub mod ingest;
pub mod store;
pub mod traversal;

pub use ingest::IngestReport;
pub use store::{EdgeData, EdgeInsert, GraphNode, GraphStats, GraphStore, IssueNode};
pub use traversal::{Neighbors, TraversalDirection};
