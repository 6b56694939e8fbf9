use crate::graph::{NodeId, RelationKind};

/// Graph mutation errors. Recoverable: the caller may retry with an explicit overwrite.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("edge {from} -> {to} already has kind {existing}, refusing {requested} without overwrite")]
    DuplicateEdgeKind {
        from: NodeId,
        to: NodeId,
        existing: RelationKind,
        requested: RelationKind,
    },
}
