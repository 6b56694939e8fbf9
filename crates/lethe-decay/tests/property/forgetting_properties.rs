use chrono::Duration;
use lethe_core::{Issue, IssueStatus};
use lethe_decay::factors::usage;
use lethe_decay::{ForgettingScorer, ForgettingWeights};
use proptest::prelude::*;
use test_fixtures::fixed_now;

/// Valid weight triples: two cut points on [0, 1].
fn arb_weights() -> impl Strategy<Value = ForgettingWeights> {
    (0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(a, b)| {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let usage = lo;
        let recency = hi - lo;
        let relevance = 1.0 - usage - recency;
        ForgettingWeights::new(usage, recency, relevance.max(0.0)).unwrap_or_default()
    })
}

proptest! {
    #[test]
    fn usage_is_monotone_and_bounded(a in 0u64..10_000, b in 0u64..10_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (u_lo, u_hi) = (usage::from_count(lo), usage::from_count(hi));
        prop_assert!(u_lo <= u_hi);
        prop_assert!((0.0..=1.0).contains(&u_lo));
        prop_assert!((0.0..=1.0).contains(&u_hi));
    }

    #[test]
    fn score_stays_in_range_for_valid_weights(
        weights in arb_weights(),
        decay_rate in 0.0f64..10.0,
        age_days in -1_000i64..20_000,
        accesses in 0u64..1_000,
        relevance in -1.0f64..=1.0,
    ) {
        let created = fixed_now() - Duration::days(age_days);
        let issue = Issue::new("I", "t", IssueStatus::Open, created).with_access(accesses, None);
        let scorer = ForgettingScorer::new(weights, decay_rate).unwrap();
        let s = scorer.score_with_relevance(&issue, Some(relevance), fixed_now()).score;
        prop_assert!((-1.0..=1.0).contains(&s), "score {} out of range", s);
    }

    #[test]
    fn more_recent_access_never_scores_lower(
        older in 1i64..5_000,
        gap in 0i64..5_000,
    ) {
        let scorer = ForgettingScorer::new(ForgettingWeights::DEFAULT, 0.1).unwrap();
        let created = fixed_now() - Duration::days(older + gap);
        let stale = Issue::new("a", "t", IssueStatus::Open, created)
            .with_access(1, Some(fixed_now() - Duration::days(older + gap)));
        let recent = Issue::new("b", "t", IssueStatus::Open, created)
            .with_access(1, Some(fixed_now() - Duration::days(older)));
        let s_stale = scorer.score_with_relevance(&stale, Some(0.0), fixed_now()).score;
        let s_recent = scorer.score_with_relevance(&recent, Some(0.0), fixed_now()).score;
        prop_assert!(s_recent >= s_stale);
    }
}
