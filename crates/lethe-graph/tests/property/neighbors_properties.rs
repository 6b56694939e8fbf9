use std::collections::HashSet;

use lethe_core::*;
use lethe_graph::GraphStore;
use proptest::prelude::*;

fn build(n: usize, edges: &[(usize, usize)]) -> GraphStore {
    let mut store = GraphStore::new();
    for i in 0..n {
        store.insert_entity(Entity::new(format!("E{i:02}"), "IfcSpace", ""));
    }
    for &(a, b) in edges {
        let from = NodeId::entity(format!("E{:02}", a % n));
        let to = NodeId::entity(format!("E{:02}", b % n));
        // Conflicts cannot happen: every edge has the same kind.
        let _ = store.insert_edge(&from, &to, RelationKind::Adjacent, Weight::FULL);
    }
    store
}

proptest! {
    #[test]
    fn neighbors_grow_monotonically_with_hops(
        n in 1usize..12,
        edges in prop::collection::vec((0usize..12, 0usize..12), 0..40),
        start in 0usize..12,
        k in 0usize..6,
    ) {
        let store = build(n, &edges);
        let id = NodeId::entity(format!("E{:02}", start % n));
        let small: HashSet<_> = store.neighbors(&id, k).collect();
        let large: HashSet<_> = store.neighbors(&id, k + 1).collect();
        prop_assert!(small.is_subset(&large));
    }

    #[test]
    fn neighbors_visit_each_node_once_within_bound(
        n in 1usize..12,
        edges in prop::collection::vec((0usize..12, 0usize..12), 0..40),
        start in 0usize..12,
        k in 0usize..8,
    ) {
        let store = build(n, &edges);
        let id = NodeId::entity(format!("E{:02}", start % n));
        let out: Vec<_> = store.neighbors(&id, k).collect();
        let unique: HashSet<_> = out.iter().map(|(node, _)| node.clone()).collect();
        prop_assert_eq!(unique.len(), out.len());
        prop_assert!(out.iter().all(|(_, d)| *d <= k));
        prop_assert!(out.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}
