//! Breadth-first neighbourhood traversal.

pub mod neighbors;

pub use neighbors::Neighbors;

/// Which edges a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalDirection {
    /// Follow edges from source to target.
    #[default]
    Outgoing,
    /// Follow edges backwards.
    Incoming,
    /// Treat the graph as undirected.
    Both,
}
