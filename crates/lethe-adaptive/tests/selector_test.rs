use std::time::Duration;

use lethe_adaptive::*;
use lethe_core::config::SelectorConfig;
use lethe_core::errors::ConfigError;
use lethe_core::{EngineKind, FusionPolicy, QueryType};

const MS: Duration = Duration::from_millis(5);

fn config(seed: u64) -> SelectorConfig {
    SelectorConfig {
        seed: Some(seed),
        ..SelectorConfig::default()
    }
}

fn two_engines(seed: u64) -> AdaptiveSelector<EngineKind> {
    AdaptiveSelector::new(vec![EngineKind::Lexical, EngineKind::Similarity], &config(seed)).unwrap()
}

fn feed(sel: &AdaptiveSelector<EngineKind>, arm: EngineKind, qt: QueryType, conf: f64, n: usize) {
    for _ in 0..n {
        sel.record_outcome(arm, qt, conf > 0.5, conf, MS);
    }
}

// ── Construction ──

#[test]
fn rejects_epsilon_out_of_range() {
    let cfg = SelectorConfig {
        epsilon: -0.1,
        ..SelectorConfig::default()
    };
    let err = AdaptiveSelector::new(vec![EngineKind::Lexical], &cfg).err().unwrap();
    assert_eq!(err, ConfigError::InvalidEpsilon { value: -0.1 });
}

#[test]
fn rejects_empty_arm_set() {
    let err = AdaptiveSelector::<EngineKind>::new(vec![], &config(1)).err().unwrap();
    assert!(matches!(err, ConfigError::EmptyCandidateSet { .. }));
}

#[test]
fn duplicate_arms_are_registered_once() {
    let sel = AdaptiveSelector::new(
        vec![EngineKind::Lexical, EngineKind::Lexical, EngineKind::Forgetting],
        &config(1),
    )
    .unwrap();
    assert_eq!(sel.arms(), &[EngineKind::Lexical, EngineKind::Forgetting]);
}

// ── State machine ──

#[test]
fn key_state_follows_sample_count() {
    let sel = two_engines(7);
    let qt = QueryType::Keyword;
    assert_eq!(sel.state(EngineKind::Lexical, qt), ArmState::Unobserved);
    feed(&sel, EngineKind::Lexical, qt, 0.5, 4);
    assert_eq!(sel.state(EngineKind::Lexical, qt), ArmState::Exploring);
    feed(&sel, EngineKind::Lexical, qt, 0.5, 1);
    assert_eq!(sel.state(EngineKind::Lexical, qt), ArmState::Exploiting);
    // Other query types are separate keys.
    assert_eq!(sel.state(EngineKind::Lexical, QueryType::Author), ArmState::Unobserved);
}

// ── Selection ──

#[test]
fn no_history_selects_uniformly() {
    let sel = two_engines(11);
    let mut lexical = 0;
    for _ in 0..1000 {
        let choice = sel.select(QueryType::Keyword);
        assert_eq!(choice.mode, SelectionMode::Uniform);
        if choice.arm == EngineKind::Lexical {
            lexical += 1;
        }
    }
    assert!((400..=600).contains(&lexical), "lexical picked {lexical} times");
}

#[test]
fn high_mean_engine_is_chosen_about_ninety_percent() {
    let sel = two_engines(42);
    let qt = QueryType::Keyword;
    feed(&sel, EngineKind::Lexical, qt, 0.9, 20);
    feed(&sel, EngineKind::Similarity, qt, 0.1, 20);

    let mut high = 0;
    for _ in 0..1000 {
        let choice = sel.select(qt);
        if choice.arm == EngineKind::Lexical {
            assert_eq!(choice.mode, SelectionMode::Exploit);
            high += 1;
        } else {
            assert_eq!(choice.mode, SelectionMode::Explore);
        }
    }
    let share = high as f64 / 1000.0;
    assert!((share - 0.9).abs() <= 0.03, "high-mean share = {share}");
}

#[test]
fn only_exploiting_keys_compete() {
    let cfg = SelectorConfig {
        epsilon: 0.0,
        ..config(3)
    };
    let greedy =
        AdaptiveSelector::new(vec![EngineKind::Lexical, EngineKind::Similarity], &cfg).unwrap();
    let qt = QueryType::Temporal;
    // Similarity has a higher mean but too few samples.
    feed(&greedy, EngineKind::Lexical, qt, 0.4, 5);
    feed(&greedy, EngineKind::Similarity, qt, 0.99, 2);
    assert_eq!(greedy.state(EngineKind::Similarity, qt), ArmState::Exploring);
    for _ in 0..50 {
        assert_eq!(greedy.select(qt).arm, EngineKind::Lexical);
    }
}

#[test]
fn ties_go_to_registration_order() {
    let cfg = SelectorConfig {
        epsilon: 0.0,
        ..config(5)
    };
    let sel = AdaptiveSelector::new(
        vec![EngineKind::Forgetting, EngineKind::Lexical],
        &cfg,
    )
    .unwrap();
    let qt = QueryType::Keyword;
    sel.record_outcome(EngineKind::Lexical, qt, true, 0.7, MS);
    sel.record_outcome(EngineKind::Forgetting, qt, true, 0.7, MS);
    for arm in [EngineKind::Lexical, EngineKind::Forgetting] {
        for _ in 0..4 {
            sel.record_outcome(arm, qt, true, 0.7, MS);
        }
    }
    assert_eq!(
        sel.select(qt),
        EngineChoice {
            arm: EngineKind::Forgetting,
            mode: SelectionMode::Exploit
        }
    );
}

#[test]
fn same_seed_same_choices() {
    let run = || {
        let sel = two_engines(99);
        feed(&sel, EngineKind::Lexical, QueryType::Keyword, 0.8, 10);
        feed(&sel, EngineKind::Similarity, QueryType::Keyword, 0.3, 10);
        (0..200)
            .map(|_| sel.select(QueryType::Keyword))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn restricted_candidates_limit_the_choice() {
    let mut sel = AdaptiveSelector::new(EngineKind::ALL.to_vec(), &config(8)).unwrap();
    sel.restrict(QueryType::Identifier, &[EngineKind::Lexical]).unwrap();
    for _ in 0..100 {
        assert_eq!(sel.select(QueryType::Identifier).arm, EngineKind::Lexical);
    }
    assert_eq!(sel.candidates(QueryType::Keyword).len(), 3);
    assert!(sel.restrict(QueryType::Author, &[]).is_err());
}

#[test]
fn fusion_policies_use_an_independent_selector() {
    let policies =
        AdaptiveSelector::new(vec![FusionPolicy::Basic, FusionPolicy::Weighted], &config(1)).unwrap();
    let engines = two_engines(1);
    feed(&engines, EngineKind::Lexical, QueryType::Keyword, 0.9, 10);
    assert_eq!(policies.state(FusionPolicy::Basic, QueryType::Keyword), ArmState::Unobserved);
    assert_eq!(policies.select(QueryType::Keyword).mode, SelectionMode::Uniform);
}

// ── Ring buffer ──

#[test]
fn window_keeps_exactly_the_most_recent_samples() {
    let cfg = SelectorConfig {
        window_capacity: 100,
        ..config(1)
    };
    let sel = AdaptiveSelector::new(vec![EngineKind::Lexical], &cfg).unwrap();
    for i in 0..130 {
        sel.record_outcome(EngineKind::Lexical, QueryType::Keyword, true, i as f64 / 1000.0, MS);
    }
    let record = sel.record(EngineKind::Lexical, QueryType::Keyword).unwrap();
    assert_eq!(record.len(), 100);
    let confs: Vec<f64> = record.samples().map(|s| s.confidence).collect();
    let expected: Vec<f64> = (30..130).map(|i| i as f64 / 1000.0).collect();
    assert_eq!(confs, expected);
}

// ── Weights ──

#[test]
fn weights_move_toward_relative_performance_and_stay_clamped() {
    let sel = two_engines(1);
    feed(&sel, EngineKind::Lexical, QueryType::Keyword, 0.9, 10);
    feed(&sel, EngineKind::Similarity, QueryType::Keyword, 0.1, 10);

    let w = sel.adapt_weights(0.5).unwrap();
    // global mean 0.5: targets 1.8 and 0.2
    assert!((w[&EngineKind::Lexical] - 1.4).abs() < 1e-9);
    assert!((w[&EngineKind::Similarity] - 0.6).abs() < 1e-9);

    for _ in 0..100 {
        sel.adapt_weights(1.0).unwrap();
    }
    assert!((sel.weight(EngineKind::Lexical) - 1.8).abs() < 1e-9);
    assert!((sel.weight(EngineKind::Similarity) - 0.2).abs() < 1e-9);
}

#[test]
fn weights_clamp_to_bounds() {
    let sel = two_engines(1);
    feed(&sel, EngineKind::Lexical, QueryType::Keyword, 1.0, 10);
    feed(&sel, EngineKind::Similarity, QueryType::Keyword, 0.0, 10);
    let w = sel.adapt_weights(1.0).unwrap();
    assert_eq!(w[&EngineKind::Lexical], 2.0);
    assert_eq!(w[&EngineKind::Similarity], 0.1);
}

#[test]
fn adapt_weights_rejects_bad_learning_rate() {
    let sel = two_engines(1);
    assert!(matches!(
        sel.adapt_weights(0.0),
        Err(ConfigError::InvalidLearningRate { .. })
    ));
    assert!(sel.adapt_weights(1.5).is_err());
}

#[test]
fn unobserved_arms_keep_unit_weight() {
    let sel = two_engines(1);
    let w = sel.adapt_weights(0.5).unwrap();
    assert_eq!(w[&EngineKind::Lexical], 1.0);
    assert_eq!(sel.weight(EngineKind::Similarity), 1.0);
}

#[test]
fn adaptation_does_not_depend_on_insertion_order() {
    let forward = two_engines(1);
    let backward = two_engines(1);
    let keys = [
        (EngineKind::Lexical, QueryType::Keyword, 0.91),
        (EngineKind::Lexical, QueryType::Temporal, 0.13),
        (EngineKind::Lexical, QueryType::Author, 0.37),
        (EngineKind::Similarity, QueryType::Identifier, 0.77),
        (EngineKind::Similarity, QueryType::Keyword, 0.29),
    ];
    for &(arm, qt, conf) in &keys {
        feed(&forward, arm, qt, conf, 3);
    }
    for &(arm, qt, conf) in keys.iter().rev() {
        feed(&backward, arm, qt, conf, 3);
    }

    for _ in 0..5 {
        assert_eq!(
            forward.adapt_weights(0.3).unwrap(),
            backward.adapt_weights(0.3).unwrap()
        );
    }
}

// ── Persistence ──

#[test]
fn state_roundtrips_through_json() {
    let sel = two_engines(3);
    feed(&sel, EngineKind::Lexical, QueryType::Keyword, 0.9, 6);
    feed(&sel, EngineKind::Similarity, QueryType::Temporal, 0.4, 2);
    sel.adapt_weights(0.5).unwrap();

    let state = sel.export_state();
    assert_eq!(state.config, config(3));
    assert_eq!(state.records.len(), 2);
    assert_eq!(state.records[0].arm, EngineKind::Lexical);
    assert_eq!(state.weights[0].0, EngineKind::Lexical);

    let text = state.to_json().unwrap();
    let parsed = SelectorState::<EngineKind>::from_json(&text).unwrap();
    assert_eq!(parsed, state);

    let restored =
        AdaptiveSelector::from_state(vec![EngineKind::Lexical, EngineKind::Similarity], &parsed)
            .unwrap();
    assert_eq!(restored.snapshot(), sel.snapshot());
    assert_eq!(restored.weights(), sel.weights());
    assert_eq!(
        restored.state(EngineKind::Lexical, QueryType::Keyword),
        ArmState::Exploiting
    );
}

#[test]
fn restored_selector_exploits_like_the_original() {
    let sel = two_engines(9);
    feed(&sel, EngineKind::Similarity, QueryType::Temporal, 0.95, 10);
    feed(&sel, EngineKind::Lexical, QueryType::Temporal, 0.05, 10);
    let state = sel.export_state();

    let fresh = two_engines(9);
    fresh.restore_state(&state);
    let exploits = (0..200)
        .map(|_| fresh.select(QueryType::Temporal))
        .filter(|c| c.mode == SelectionMode::Exploit)
        .collect::<Vec<_>>();
    assert!(!exploits.is_empty());
    assert!(exploits.iter().all(|c| c.arm == EngineKind::Similarity));
}

#[test]
fn restore_skips_unknown_arms_and_clamps_weights() {
    let state = SelectorState {
        config: config(1),
        records: vec![RecordState {
            arm: EngineKind::Forgetting,
            query_type: QueryType::Keyword,
            samples: vec![OutcomeSample {
                success: true,
                confidence: 0.8,
                latency: MS,
            }],
        }],
        weights: vec![
            (EngineKind::Lexical, 7.5),
            (EngineKind::Similarity, f64::NAN),
            (EngineKind::Forgetting, 0.5),
        ],
    };
    let sel = two_engines(1);
    sel.restore_state(&state);

    assert!(sel.record(EngineKind::Forgetting, QueryType::Keyword).is_none());
    assert_eq!(sel.weight(EngineKind::Lexical), 2.0);
    assert_eq!(sel.weight(EngineKind::Similarity), 1.0);
    assert_eq!(sel.weights().len(), 2);
}

#[test]
fn restore_respects_window_capacity() {
    let small = SelectorConfig {
        window_capacity: 4,
        ..config(1)
    };
    let samples: Vec<OutcomeSample> = (0..10)
        .map(|i| OutcomeSample {
            success: true,
            confidence: i as f64 / 10.0,
            latency: MS,
        })
        .collect();
    let state = SelectorState {
        config: config(1),
        records: vec![RecordState {
            arm: EngineKind::Lexical,
            query_type: QueryType::Keyword,
            samples,
        }],
        weights: vec![],
    };
    let sel = AdaptiveSelector::new(vec![EngineKind::Lexical], &small).unwrap();
    sel.restore_state(&state);

    let record = sel.record(EngineKind::Lexical, QueryType::Keyword).unwrap();
    let confs: Vec<f64> = record.samples().map(|s| s.confidence).collect();
    assert_eq!(confs, vec![0.6, 0.7, 0.8, 0.9]);
}

#[test]
fn reset_forgets_history_and_weights() {
    let sel = two_engines(1);
    feed(&sel, EngineKind::Lexical, QueryType::Keyword, 1.0, 10);
    feed(&sel, EngineKind::Similarity, QueryType::Keyword, 0.0, 10);
    sel.adapt_weights(1.0).unwrap();

    sel.reset();
    assert!(sel.record(EngineKind::Lexical, QueryType::Keyword).is_none());
    assert_eq!(sel.weight(EngineKind::Lexical), 1.0);
    assert!(sel.export_state().records.is_empty());
}

// ── Telemetry ──

#[test]
fn outcomes_are_published_to_subscribers() {
    let sel = two_engines(1);
    let mut rx = sel.subscribe();
    sel.record_outcome(EngineKind::Similarity, QueryType::Author, true, 0.75, MS);
    let event = rx.try_recv().unwrap();
    assert_eq!(event.arm, EngineKind::Similarity);
    assert_eq!(event.query_type, QueryType::Author);
    assert_eq!(event.confidence, 0.75);
    assert_eq!(event.window_len, 1);
    assert!(rx.try_recv().is_err());
}

#[test]
fn snapshot_reports_every_observed_key() {
    let sel = two_engines(1);
    feed(&sel, EngineKind::Lexical, QueryType::Keyword, 0.8, 6);
    feed(&sel, EngineKind::Similarity, QueryType::Temporal, 0.2, 2);
    let snap = sel.snapshot();
    assert_eq!(snap.keys.len(), 2);
    let lexical = snap
        .keys
        .iter()
        .find(|k| k.arm == EngineKind::Lexical)
        .unwrap();
    assert_eq!(lexical.count, 6);
    assert_eq!(lexical.state, ArmState::Exploiting);
    assert!((lexical.success_rate - 1.0).abs() < 1e-9);
    assert_eq!(snap.weights.len(), 2);
}

// ── Concurrency ──

#[test]
fn concurrent_writers_on_one_key_lose_nothing_up_to_capacity() {
    let cfg = SelectorConfig {
        window_capacity: 10_000,
        ..config(1)
    };
    let sel = AdaptiveSelector::new(vec![EngineKind::Lexical], &cfg).unwrap();
    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..500 {
                    sel.record_outcome(EngineKind::Lexical, QueryType::Keyword, true, 0.5, MS);
                }
            });
        }
    });
    assert_eq!(
        sel.record(EngineKind::Lexical, QueryType::Keyword).unwrap().len(),
        4000
    );
}
