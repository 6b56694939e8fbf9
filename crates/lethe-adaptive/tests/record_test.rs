use std::time::Duration;

use lethe_adaptive::{OutcomeSample, PerformanceRecord};
use proptest::prelude::*;

fn sample(confidence: f64, secs: f64) -> OutcomeSample {
    OutcomeSample {
        success: confidence >= 0.5,
        confidence,
        latency: Duration::from_secs_f64(secs),
    }
}

#[test]
fn empty_record_reports_zero() {
    let r = PerformanceRecord::new(5);
    assert!(r.is_empty());
    assert_eq!(r.mean_confidence(), 0.0);
    assert_eq!(r.success_rate(), 0.0);
    assert_eq!(r.mean_latency(), Duration::ZERO);
    assert_eq!(r.performance_score(), 0.0);
}

#[test]
fn aggregates_over_the_window() {
    let mut r = PerformanceRecord::new(5);
    r.push(sample(0.2, 1.0));
    r.push(sample(0.8, 3.0));
    assert!((r.mean_confidence() - 0.5).abs() < 1e-9);
    assert_eq!(r.success_rate(), 0.5);
    assert_eq!(r.mean_latency(), Duration::from_secs(2));
    // 0.5 * 0.4 + 0.2 * 0.3 + 0.6 * 0.3
    assert!((r.performance_score() - 0.44).abs() < 1e-9);
}

proptest! {
    #[test]
    fn ring_buffer_keeps_n_most_recent(cap in 1usize..50, extra in 0usize..80) {
        let mut r = PerformanceRecord::new(cap);
        let total = cap + extra;
        for i in 0..total {
            r.push(sample(i as f64, 0.0));
        }
        prop_assert_eq!(r.len(), cap);
        let kept: Vec<f64> = r.samples().map(|s| s.confidence).collect();
        let expected: Vec<f64> = (extra..total).map(|i| i as f64).collect();
        prop_assert_eq!(kept, expected);
    }
}
