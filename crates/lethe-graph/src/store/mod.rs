pub mod node;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Directed;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lethe_core::config::GraphConfig;
use lethe_core::errors::GraphError;
use lethe_core::{Edge, Entity, Issue, NodeId, RelationKind, Weight};

pub use node::{GraphNode, IssueNode};

/// Payload stored on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub kind: RelationKind,
    pub weight: Weight,
}

/// The underlying directed graph type.
pub type KnowledgeGraph = StableGraph<GraphNode, EdgeData, Directed>;

/// What `insert_edge` / `upsert_edge` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    Inserted,
    /// Same (from, to, kind) already present; nothing changed.
    Unchanged,
    /// A conflicting kind was replaced (upsert only).
    Replaced,
    /// One of the endpoints is not in the store.
    SkippedDangling,
}

/// Counts reported by [`GraphStore::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub entities: usize,
    pub issues: usize,
    pub edges: usize,
    /// Issue references to unknown entities dropped so far.
    pub dangling_references: usize,
    /// Edges skipped because an endpoint was missing.
    pub skipped_edges: usize,
}

/// In-memory store of entities, issues and the relations between them.
pub struct GraphStore {
    graph: KnowledgeGraph,
    /// Map from NodeId → NodeIndex. Ordered so iteration is deterministic.
    node_index: BTreeMap<NodeId, NodeIndex>,
    /// Raw entity id → raw ids of the issues referencing it.
    references: HashMap<String, BTreeSet<String>>,
    /// Structural relations whose target entity has not arrived yet:
    /// target raw id → (source raw id, kind).
    pending_relations: HashMap<String, Vec<(String, RelationKind)>>,
    config: GraphConfig,
    dangling_references: usize,
    skipped_edges: usize,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: BTreeMap::new(),
            references: HashMap::new(),
            pending_relations: HashMap::new(),
            config,
            dangling_references: 0,
            skipped_edges: 0,
        }
    }

    // ── Mutation (single writer) ──

    /// Insert an entity. A repeated id overwrites `category` and `name`;
    /// relations from the first insert are kept and later ones are ignored.
    pub fn insert_entity(&mut self, entity: Entity) -> NodeIndex {
        let id = entity.node_id();
        if let Some(&idx) = self.node_index.get(&id) {
            if let Some(GraphNode::Entity(existing)) = self.graph.node_weight_mut(idx) {
                existing.category = entity.category;
                existing.name = entity.name;
            }
            debug!(entity = %id, "entity re-inserted, attributes overwritten");
            return idx;
        }

        let relations = entity.relations.clone();
        let raw = entity.id.clone();
        let idx = self.graph.add_node(GraphNode::Entity(entity));
        self.node_index.insert(id.clone(), idx);
        debug!(entity = %id, relations = relations.len(), "entity inserted");

        let structural = Weight::new(self.config.structural_weight);
        for relation in relations {
            let target = NodeId::entity(&relation.target);
            if self.node_index.contains_key(&target) {
                self.link_structural(&raw, &relation.target, relation.kind, structural);
            } else {
                self.pending_relations
                    .entry(relation.target)
                    .or_default()
                    .push((raw.clone(), relation.kind));
            }
        }

        if let Some(waiting) = self.pending_relations.remove(&raw) {
            for (source, kind) in waiting {
                self.link_structural(&source, &raw, kind, structural);
            }
        }
        idx
    }

    /// Insert an issue. References to unknown entities are dropped with a warning.
    ///
    /// A repeated id overwrites the descriptive attributes only. References and
    /// the live access counters of the first insert stay in place.
    pub fn insert_issue(&mut self, issue: Issue) -> NodeIndex {
        let id = issue.node_id();
        if let Some(&idx) = self.node_index.get(&id) {
            if let Some(GraphNode::Issue(existing)) = self.graph.node_weight_mut(idx) {
                existing.overwrite_attributes(&issue);
            }
            debug!(issue = %id, "issue re-inserted, attributes overwritten");
            return idx;
        }

        let mut accepted = BTreeSet::new();
        for entity_id in &issue.references {
            if self.node_index.contains_key(&NodeId::entity(entity_id)) {
                accepted.insert(entity_id.clone());
            } else {
                self.dangling_references += 1;
                warn!(issue = %id, entity = %entity_id, "dropping reference to unknown entity");
            }
        }

        let mut stored = issue;
        stored.references = accepted.clone();
        let idx = self.graph.add_node(GraphNode::Issue(IssueNode::new(stored)));
        self.node_index.insert(id.clone(), idx);

        let weight = Weight::new(self.config.reference_weight);
        for entity_id in accepted {
            if let Some(&target) = self.node_index.get(&NodeId::entity(&entity_id)) {
                if self.graph.find_edge(idx, target).is_none() {
                    self.graph.add_edge(
                        idx,
                        target,
                        EdgeData {
                            kind: RelationKind::References,
                            weight,
                        },
                    );
                }
            }
            self.references
                .entry(entity_id)
                .or_default()
                .insert(id.raw().to_string());
        }
        debug!(issue = %id, "issue inserted");
        idx
    }

    /// Insert a directed edge.
    ///
    /// Fails with `DuplicateEdgeKind` when the pair already carries a different
    /// kind. The same kind again is a no-op and keeps the original weight.
    pub fn insert_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        kind: RelationKind,
        weight: Weight,
    ) -> Result<EdgeInsert, GraphError> {
        self.put_edge(from, to, kind, weight, false)
    }

    /// Like [`insert_edge`](Self::insert_edge) but replaces a conflicting kind.
    pub fn upsert_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        kind: RelationKind,
        weight: Weight,
    ) -> EdgeInsert {
        // Cannot fail with overwrite enabled.
        self.put_edge(from, to, kind, weight, true)
            .unwrap_or(EdgeInsert::Unchanged)
    }

    /// Insert an [`Edge`] record.
    pub fn insert_edge_record(&mut self, edge: &Edge) -> Result<EdgeInsert, GraphError> {
        self.insert_edge(&edge.from, &edge.to, edge.kind, edge.weight)
    }

    fn put_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        kind: RelationKind,
        weight: Weight,
        overwrite: bool,
    ) -> Result<EdgeInsert, GraphError> {
        let (Some(&a), Some(&b)) = (self.node_index.get(from), self.node_index.get(to)) else {
            self.skipped_edges += 1;
            warn!(%from, %to, %kind, "skipping edge with unknown endpoint");
            return Ok(EdgeInsert::SkippedDangling);
        };

        let outcome = match self.graph.find_edge(a, b) {
            Some(edge_idx) => {
                let existing = self.graph[edge_idx].kind;
                if existing == kind {
                    return Ok(EdgeInsert::Unchanged);
                }
                if !overwrite {
                    return Err(GraphError::DuplicateEdgeKind {
                        from: from.clone(),
                        to: to.clone(),
                        existing,
                        requested: kind,
                    });
                }
                self.graph[edge_idx] = EdgeData { kind, weight };
                debug!(%from, %to, %existing, %kind, "edge kind replaced");
                EdgeInsert::Replaced
            }
            None => {
                self.graph.add_edge(a, b, EdgeData { kind, weight });
                EdgeInsert::Inserted
            }
        };

        if kind == RelationKind::References {
            if let (NodeId::Issue(issue_id), NodeId::Entity(entity_id)) = (from, to) {
                if let Some(GraphNode::Issue(node)) = self.graph.node_weight_mut(a) {
                    node.add_reference(entity_id);
                }
                self.references
                    .entry(entity_id.clone())
                    .or_default()
                    .insert(issue_id.clone());
            }
        }
        Ok(outcome)
    }

    fn link_structural(&mut self, source: &str, target: &str, kind: RelationKind, weight: Weight) {
        let from = NodeId::entity(source);
        let to = NodeId::entity(target);
        if let Err(err) = self.put_edge(&from, &to, kind, weight, false) {
            warn!(error = %err, "conflicting structural relation ignored");
        }
    }

    // ── Concurrent access tracking ──

    /// Increment the access counter of an issue and move its last-access time
    /// forward to `at`. Returns false (and does nothing) if the issue is absent.
    pub fn record_access(&self, issue_id: &str, at: DateTime<Utc>) -> bool {
        match self.issue_node(issue_id) {
            Some(node) => {
                node.record_access(at);
                true
            }
            None => false,
        }
    }

    // ── Lookups ──

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        let idx = self.node_index.get(&NodeId::entity(id))?;
        match self.graph.node_weight(*idx)? {
            GraphNode::Entity(entity) => Some(entity),
            GraphNode::Issue(_) => None,
        }
    }

    /// Live view of an issue node. Counters are read atomically.
    pub fn issue_node(&self, id: &str) -> Option<&IssueNode> {
        let idx = self.node_index.get(&NodeId::issue(id))?;
        match self.graph.node_weight(*idx)? {
            GraphNode::Issue(node) => Some(node),
            GraphNode::Entity(_) => None,
        }
    }

    /// Snapshot of an issue including its current access counter.
    pub fn issue(&self, id: &str) -> Option<Issue> {
        self.issue_node(id).map(IssueNode::snapshot)
    }

    /// All issue snapshots, ordered by id.
    pub fn issues(&self) -> impl Iterator<Item = Issue> + '_ {
        self.issue_nodes().map(IssueNode::snapshot)
    }

    /// All live issue nodes, ordered by id.
    pub fn issue_nodes(&self) -> impl Iterator<Item = &IssueNode> + '_ {
        self.node_index
            .iter()
            .filter(|(id, _)| id.is_issue())
            .filter_map(|(_, idx)| match self.graph.node_weight(*idx) {
                Some(GraphNode::Issue(node)) => Some(node),
                _ => None,
            })
    }

    /// All entities, ordered by id.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.node_index
            .iter()
            .filter(|(id, _)| id.is_entity())
            .filter_map(|(_, idx)| match self.graph.node_weight(*idx) {
                Some(GraphNode::Entity(entity)) => Some(entity),
                _ => None,
            })
    }

    /// Issues whose reference set contains `entity_id`, ordered by id.
    pub fn issues_referencing(&self, entity_id: &str) -> Vec<Issue> {
        self.references
            .get(entity_id)
            .map(|ids| ids.iter().filter_map(|id| self.issue(id)).collect())
            .unwrap_or_default()
    }

    /// Issues by a given author (case-insensitive), ordered by id.
    pub fn issues_by_author(&self, author: &str) -> Vec<Issue> {
        let needle = author.to_lowercase();
        self.issue_nodes()
            .filter(|node| node.issue().author.to_lowercase() == needle)
            .map(IssueNode::snapshot)
            .collect()
    }

    /// The edge between two nodes, if any.
    pub fn edge(&self, from: &NodeId, to: &NodeId) -> Option<Edge> {
        let a = self.node_index.get(from)?;
        let b = self.node_index.get(to)?;
        let data = self.graph.edge_weight(self.graph.find_edge(*a, *b)?)?;
        Some(Edge::new(from.clone(), to.clone(), data.kind, data.weight))
    }

    pub fn stats(&self) -> GraphStats {
        let issues = self.node_index.keys().filter(|id| id.is_issue()).count();
        GraphStats {
            entities: self.node_index.len() - issues,
            issues,
            edges: self.graph.edge_count(),
            dangling_references: self.dangling_references,
            skipped_edges: self.skipped_edges,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node_index.is_empty()
    }

    pub(crate) fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
