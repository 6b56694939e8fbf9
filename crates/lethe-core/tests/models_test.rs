use chrono::{Duration, TimeZone, Utc};
use lethe_core::*;

// ── NodeId ──

#[test]
fn node_ids_are_namespaced() {
    let e = NodeId::entity("X");
    let i = NodeId::issue("X");
    assert_ne!(e, i);
    assert_eq!(e.to_string(), "entity:X");
    assert_eq!(i.to_string(), "issue:X");
    assert_eq!(e.raw(), i.raw());
}

#[test]
fn node_id_parses_its_display_form() {
    let id: NodeId = "issue:I-42".parse().unwrap();
    assert_eq!(id, NodeId::issue("I-42"));
    assert!("I-42".parse::<NodeId>().is_err());
    assert!("widget:I-42".parse::<NodeId>().is_err());
    assert!("entity:".parse::<NodeId>().is_err());
}

#[test]
fn node_id_order_matches_display_order() {
    let mut ids = vec![
        NodeId::issue("A"),
        NodeId::entity("Z"),
        NodeId::entity("B"),
        NodeId::issue("0"),
    ];
    let mut by_text: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    ids.sort();
    by_text.sort();
    let sorted: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    assert_eq!(sorted, by_text);
}

#[test]
fn node_id_serializes_as_string() {
    let json = serde_json::to_string(&NodeId::entity("W1")).unwrap();
    assert_eq!(json, "\"entity:W1\"");
    let back: NodeId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, NodeId::entity("W1"));
}

// ── Weight ──

#[test]
fn weight_clamps_to_unit_interval() {
    assert_eq!(Weight::new(1.7).value(), 1.0);
    assert_eq!(Weight::new(-0.3).value(), 0.0);
    assert_eq!(Weight::new(f64::NAN).value(), 0.0);
    assert_eq!(Weight::new(0.42).value(), 0.42);
    let w: Weight = serde_json::from_str("3.0").unwrap();
    assert_eq!(w.value(), 1.0);
}

// ── Issue ──

#[test]
fn issue_falls_back_to_creation_time_when_never_accessed() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let issue = Issue::new("I1", "Leak", IssueStatus::Open, created);
    assert_eq!(issue.last_access_or_creation(), created);

    let accessed = created + Duration::days(3);
    let issue = issue.with_access(1, Some(accessed));
    assert_eq!(issue.last_access_or_creation(), accessed);
}

#[test]
fn issue_text_joins_title_and_description() {
    let created = Utc::now();
    let issue = Issue::new("I1", "Wall crack", IssueStatus::Open, created);
    assert_eq!(issue.text(), "Wall crack");
    let issue = issue.with_description("near door D2");
    assert_eq!(issue.text(), "Wall crack near door D2");
}

#[test]
fn issue_status_serializes_snake_case() {
    let json = serde_json::to_string(&IssueStatus::InProgress).unwrap();
    assert_eq!(json, "\"in_progress\"");
}

// ── Ingestion records ──

#[test]
fn ingest_record_parses_tagged_issue() {
    let line = r#"{"issue":{"id":"I1","title":"Crack","status":"open","created_at":"2024-01-01T00:00:00Z","references":["W1"]}}"#;
    let record: IngestRecord = serde_json::from_str(line).unwrap();
    match record {
        IngestRecord::Issue(issue) => {
            assert_eq!(issue.id, "I1");
            assert_eq!(issue.access_count, 0);
            assert!(issue.references.contains("W1"));
        }
        other => panic!("expected issue, got {other:?}"),
    }
}

#[test]
fn ingest_record_rejects_unknown_fields() {
    let line = r#"{"entity":{"id":"W1","category":"IfcWall","colour":"red"}}"#;
    assert!(serde_json::from_str::<IngestRecord>(line).is_err());
}

#[test]
fn ingest_record_phases_order_entities_before_edges() {
    let entity = IngestRecord::Entity(Entity::new("W1", "IfcWall", "Wall"));
    let edge = IngestRecord::Edge(Edge::new(
        NodeId::entity("W1"),
        NodeId::entity("S1"),
        RelationKind::ContainedIn,
        1.0,
    ));
    assert!(entity.phase() < edge.phase());
}

// ── Query types ──

#[test]
fn query_type_all_lists_every_tag_once() {
    let mut seen = std::collections::HashSet::new();
    for qt in QueryType::ALL {
        assert!(seen.insert(qt));
    }
    assert_eq!(seen.len(), 6);
}

#[test]
fn fusion_policy_and_engine_kind_display_snake_case() {
    assert_eq!(FusionPolicy::Weighted.to_string(), "weighted");
    assert_eq!(EngineKind::Forgetting.to_string(), "forgetting");
}

// ── Properties ──

proptest::proptest! {
    #[test]
    fn weight_is_always_in_unit_interval(v in proptest::num::f64::ANY) {
        let w = Weight::new(v).value();
        proptest::prop_assert!((0.0..=1.0).contains(&w));
    }

    #[test]
    fn node_id_display_parses_back(raw in "[A-Za-z0-9_$-]{1,24}", issue in proptest::bool::ANY) {
        let id = if issue { NodeId::issue(raw) } else { NodeId::entity(raw) };
        let parsed: NodeId = id.to_string().parse().unwrap();
        proptest::prop_assert_eq!(parsed, id);
    }
}
