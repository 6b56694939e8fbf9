//! Lazy level-by-level BFS: yields `(node, path length)` within a hop limit.

use std::collections::HashSet;
use std::vec::IntoIter;

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use lethe_core::NodeId;

use super::TraversalDirection;
use crate::store::GraphStore;

/// Iterator returned by [`GraphStore::neighbors`].
///
/// Each level is expanded only once the previous level has been consumed, and
/// is sorted by node id so the sequence is deterministic. A visited set makes
/// it terminate on cycles. Cloning the iterator restarts from the same point.
#[derive(Clone)]
pub struct Neighbors<'a> {
    store: &'a GraphStore,
    direction: TraversalDirection,
    max_hops: usize,
    depth: usize,
    level: IntoIter<(NodeId, NodeIndex)>,
    /// Nodes of the current level already yielded; expanded next.
    frontier: Vec<NodeIndex>,
    visited: HashSet<NodeIndex>,
}

impl<'a> Neighbors<'a> {
    pub(crate) fn new(
        store: &'a GraphStore,
        start: &NodeId,
        max_hops: usize,
        direction: TraversalDirection,
    ) -> Self {
        let mut visited = HashSet::new();
        let level = match store.node_index_of(start) {
            Some(idx) => {
                visited.insert(idx);
                vec![(start.clone(), idx)]
            }
            None => Vec::new(),
        };
        Self {
            store,
            direction,
            max_hops,
            depth: 0,
            level: level.into_iter(),
            frontier: Vec::new(),
            visited,
        }
    }

    fn adjacent(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let graph = self.store.graph();
        match self.direction {
            TraversalDirection::Outgoing => {
                graph.neighbors_directed(idx, Direction::Outgoing).collect()
            }
            TraversalDirection::Incoming => {
                graph.neighbors_directed(idx, Direction::Incoming).collect()
            }
            TraversalDirection::Both => graph
                .neighbors_directed(idx, Direction::Outgoing)
                .chain(graph.neighbors_directed(idx, Direction::Incoming))
                .collect(),
        }
    }

    /// Build the next level from the frontier. Returns false when exhausted.
    fn advance(&mut self) -> bool {
        if self.depth >= self.max_hops || self.frontier.is_empty() {
            return false;
        }

        let mut next = Vec::new();
        for idx in std::mem::take(&mut self.frontier) {
            for neighbor in self.adjacent(idx) {
                if self.visited.insert(neighbor) {
                    if let Some(node) = self.store.node(neighbor) {
                        next.push((node.id(), neighbor));
                    }
                }
            }
        }
        if next.is_empty() {
            return false;
        }

        next.sort_by(|a, b| a.0.cmp(&b.0));
        self.depth += 1;
        self.level = next.into_iter();
        true
    }
}

impl Iterator for Neighbors<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((id, idx)) = self.level.next() {
                self.frontier.push(idx);
                return Some((id, self.depth));
            }
            if !self.advance() {
                return None;
            }
        }
    }
}

impl GraphStore {
    /// Nodes reachable from `id` within `max_hops` outgoing hops, including
    /// `id` itself at distance 0. Unknown ids yield nothing.
    pub fn neighbors(&self, id: &NodeId, max_hops: usize) -> Neighbors<'_> {
        Neighbors::new(self, id, max_hops, TraversalDirection::Outgoing)
    }

    pub fn neighbors_directed(
        &self,
        id: &NodeId,
        max_hops: usize,
        direction: TraversalDirection,
    ) -> Neighbors<'_> {
        Neighbors::new(self, id, max_hops, direction)
    }
}
