use std::time::Duration;

use lethe_core::{EngineKind, FusionPolicy, QueryType};
use lethe_observability::{QueryLog, QueryLogEntry};

fn entry(ms: u64, query_type: QueryType) -> QueryLogEntry {
    QueryLogEntry::new(
        "crack near door",
        query_type,
        vec![EngineKind::Lexical],
        Duration::from_millis(ms),
        3,
    )
}

#[test]
fn empty_log_reports_zero() {
    let log = QueryLog::new();
    assert_eq!(log.count(), 0);
    assert_eq!(log.avg_latency(), Duration::ZERO);
    assert_eq!(log.latency_percentile(0.99), Duration::ZERO);
    assert_eq!(log.degraded_rate(), 0.0);
}

#[test]
fn average_and_percentiles() {
    let mut log = QueryLog::with_capacity(10);
    for ms in [10, 20, 30, 40, 50] {
        log.record(entry(ms, QueryType::Keyword));
    }
    assert_eq!(log.avg_latency(), Duration::from_millis(30));
    assert_eq!(log.latency_percentile(0.0), Duration::from_millis(10));
    assert_eq!(log.latency_percentile(0.5), Duration::from_millis(30));
    assert_eq!(log.latency_percentile(1.0), Duration::from_millis(50));
}

#[test]
fn capacity_evicts_oldest_entries() {
    let mut log = QueryLog::with_capacity(3);
    for ms in 1..=5 {
        log.record(entry(ms, QueryType::Keyword));
    }
    assert_eq!(log.count(), 3);
    let kept: Vec<u128> = log.entries().map(|e| e.latency.as_millis()).collect();
    assert_eq!(kept, vec![3, 4, 5]);
}

#[test]
fn degraded_rate_and_type_counts() {
    let mut log = QueryLog::with_capacity(10);
    log.record(entry(1, QueryType::Temporal).with_degraded(true));
    log.record(entry(1, QueryType::Temporal).with_fusion(FusionPolicy::Weighted));
    log.record(entry(1, QueryType::Author));
    log.record(entry(1, QueryType::Author));
    assert_eq!(log.degraded_rate(), 0.25);
    let counts = log.count_by_query_type();
    assert_eq!(counts[&QueryType::Temporal], 2);
    assert_eq!(counts[&QueryType::Author], 2);
    assert!(!counts.contains_key(&QueryType::Identifier));
}

#[test]
fn latency_stats_summarise_the_window() {
    let mut log = QueryLog::with_capacity(100);
    for ms in 1..=100 {
        log.record(entry(ms, QueryType::Keyword));
    }
    let stats = log.latency_stats();
    assert_eq!(stats.max, Duration::from_millis(100));
    assert_eq!(stats.p95, Duration::from_millis(95));
    assert!(stats.p50 >= Duration::from_millis(50) && stats.p50 <= Duration::from_millis(51));
    assert_eq!(stats.mean, log.avg_latency());
}

#[test]
fn engine_invocations_are_counted() {
    let mut log = QueryLog::with_capacity(10);
    log.record(entry(1, QueryType::Keyword));
    log.record(QueryLogEntry::new(
        "door",
        QueryType::Complex,
        vec![EngineKind::Lexical, EngineKind::Similarity],
        Duration::from_millis(2),
        0,
    ));
    let counts = log.count_by_engine();
    assert_eq!(counts[&EngineKind::Lexical], 2);
    assert_eq!(counts[&EngineKind::Similarity], 1);
    assert!(!counts.contains_key(&EngineKind::Forgetting));
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let mut log = QueryLog::with_capacity(0);
    log.record(entry(1, QueryType::Keyword));
    log.record(entry(2, QueryType::Keyword));
    assert_eq!(log.capacity(), 1);
    assert_eq!(log.count(), 1);
}

#[test]
fn init_tracing_is_idempotent() {
    let config = lethe_core::config::ObservabilityConfig::default();
    let _ = lethe_observability::init_tracing(&config);
    assert!(!lethe_observability::init_tracing(&config));
}
