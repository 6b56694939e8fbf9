use std::time::Duration;

use lethe_adaptive::SelectionMode;
use lethe_core::config::SelectorConfig;
use lethe_core::{Candidate, EngineKind, EngineOutput, FusionPolicy, QueryType};
use lethe_retrieval::fusion::{fuse_basic, fuse_weighted, FusionOutcome};
use lethe_retrieval::FusionEngine;

fn list(engine: EngineKind, items: &[(&str, f64)]) -> EngineOutput {
    EngineOutput::new(
        engine,
        items.iter().map(|(id, s)| Candidate::new(*id, *s)).collect(),
    )
}

fn ids(fused: &[lethe_retrieval::FusedCandidate]) -> Vec<&str> {
    fused.iter().map(|c| c.candidate_id.as_str()).collect()
}

fn seeded(epsilon: f64) -> SelectorConfig {
    SelectorConfig {
        epsilon,
        seed: Some(7),
        ..SelectorConfig::default()
    }
}

// ── Basic ──

#[test]
fn basic_fusion_scenario() {
    let lists = [
        list(EngineKind::Lexical, &[("A", 0.9), ("B", 0.5)]),
        list(EngineKind::Similarity, &[("C", 0.8), ("A", 0.9)]),
    ];
    let fused = fuse_basic(&lists, 3);
    assert_eq!(ids(&fused), vec!["A", "C", "B"]);
    assert_eq!(fused[0].score, 0.9);
    // Equal scores: the first occurrence wins.
    assert_eq!(fused[0].engine, EngineKind::Lexical);
}

#[test]
fn dedupe_keeps_highest_score() {
    let lists = [
        list(EngineKind::Lexical, &[("A", 0.4)]),
        list(EngineKind::Forgetting, &[("A", 0.7)]),
    ];
    let fused = fuse_basic(&lists, 10);
    assert_eq!(fused.len(), 1);
    assert_eq!(fused[0].score, 0.7);
    assert_eq!(fused[0].engine, EngineKind::Forgetting);
}

#[test]
fn evidence_is_unioned_in_order() {
    let mut first = list(EngineKind::Lexical, &[("A", 0.4)]);
    first.candidates[0].evidence_ids = vec!["e1".into(), "e2".into()];
    let mut second = list(EngineKind::Similarity, &[("A", 0.3)]);
    second.candidates[0].evidence_ids = vec!["e2".into(), "e3".into()];

    let fused = fuse_basic(&[first, second], 10);
    assert_eq!(fused[0].evidence_ids, vec!["e1", "e2", "e3"]);
}

#[test]
fn equal_scores_keep_list_order() {
    let xy = fuse_basic(
        &[
            list(EngineKind::Lexical, &[("X", 0.5)]),
            list(EngineKind::Similarity, &[("Y", 0.5)]),
        ],
        10,
    );
    assert_eq!(ids(&xy), vec!["X", "Y"]);

    let yx = fuse_basic(
        &[
            list(EngineKind::Lexical, &[("Y", 0.5)]),
            list(EngineKind::Similarity, &[("X", 0.5)]),
        ],
        10,
    );
    assert_eq!(ids(&yx), vec!["Y", "X"]);
}

#[test]
fn scores_are_not_renormalised() {
    let fused = fuse_basic(
        &[
            list(EngineKind::Lexical, &[("A", 7.5)]),
            list(EngineKind::Similarity, &[("B", 0.9)]),
        ],
        10,
    );
    assert_eq!(ids(&fused), vec!["A", "B"]);
    assert_eq!(fused[0].score, 7.5);
}

#[test]
fn truncates_to_top_k() {
    let lists = [list(
        EngineKind::Lexical,
        &[("A", 0.9), ("B", 0.8), ("C", 0.7), ("D", 0.6)],
    )];
    assert_eq!(fuse_basic(&lists, 2).len(), 2);
    assert!(fuse_basic(&lists, 0).is_empty());
    assert!(fuse_basic(&[], 5).is_empty());
}

// ── Weighted ──

#[test]
fn weighted_scales_by_engine_weight() {
    let lists = [
        list(EngineKind::Lexical, &[("A", 0.4)]),
        list(EngineKind::Similarity, &[("B", 0.6)]),
    ];
    let weight = |kind| match kind {
        EngineKind::Lexical => 2.0,
        _ => 0.5,
    };
    let fused = fuse_weighted(&lists, weight, 10);
    assert_eq!(ids(&fused), vec!["A", "B"]);
    assert!((fused[0].score - 0.8).abs() < 1e-12);
    assert!((fused[1].score - 0.3).abs() < 1e-12);
}

// ── FusionEngine ──

#[test]
fn fixed_policy_is_not_selected() {
    let engine = FusionEngine::new(FusionPolicy::Weighted, &seeded(0.1)).unwrap();
    assert_eq!(engine.resolve(QueryType::Keyword), (FusionPolicy::Weighted, None));

    let outcome = engine.fuse(
        &[list(EngineKind::Lexical, &[("A", 0.5)])],
        |_| 2.0,
        QueryType::Keyword,
        5,
    );
    assert_eq!(outcome.policy, FusionPolicy::Weighted);
    assert_eq!(outcome.candidates[0].score, 1.0);

    engine.record_outcome(&outcome, QueryType::Keyword, true, 0.9, Duration::from_millis(1));
    assert!(engine
        .selector()
        .record(FusionPolicy::Weighted, QueryType::Keyword)
        .is_none());
}

#[test]
fn adaptive_starts_uniform() {
    let engine = FusionEngine::new(FusionPolicy::Adaptive, &seeded(0.1)).unwrap();
    let (policy, selection) = engine.resolve(QueryType::Complex);
    assert!(matches!(policy, FusionPolicy::Basic | FusionPolicy::Weighted));
    assert_eq!(selection, Some(SelectionMode::Uniform));
}

#[test]
fn adaptive_exploits_the_better_policy() {
    let engine = FusionEngine::new(FusionPolicy::Adaptive, &seeded(0.0)).unwrap();
    let qt = QueryType::Complex;
    for _ in 0..5 {
        let good = FusionOutcome {
            policy: FusionPolicy::Weighted,
            selection: Some(SelectionMode::Uniform),
            candidates: Vec::new(),
        };
        engine.record_outcome(&good, qt, true, 0.9, Duration::from_millis(2));
        engine
            .selector()
            .record_outcome(FusionPolicy::Basic, qt, true, 0.2, Duration::from_millis(2));
    }

    for _ in 0..20 {
        assert_eq!(
            engine.resolve(qt),
            (FusionPolicy::Weighted, Some(SelectionMode::Exploit))
        );
    }
    // Other query types keep their own history.
    assert_eq!(
        engine.resolve(QueryType::Keyword).1,
        Some(SelectionMode::Uniform)
    );
}

#[test]
fn invalid_selector_config_is_rejected() {
    assert!(FusionEngine::new(FusionPolicy::Adaptive, &seeded(1.5)).is_err());
}
