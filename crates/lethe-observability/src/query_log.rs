//! Bounded log of served queries with latency and routing aggregates.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use lethe_core::config::defaults::DEFAULT_QUERY_LOG_CAPACITY;
use lethe_core::{EngineKind, FusionPolicy, QueryType};

/// What the pipeline did for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query: String,
    pub query_type: QueryType,
    /// Engines invoked, in invocation order.
    pub engines: Vec<EngineKind>,
    /// Set only when several lists were fused.
    pub fusion_policy: Option<FusionPolicy>,
    pub latency: Duration,
    pub result_count: usize,
    pub degraded: bool,
    pub logged_at: DateTime<Utc>,
}

impl QueryLogEntry {
    pub fn new(
        query: impl Into<String>,
        query_type: QueryType,
        engines: Vec<EngineKind>,
        latency: Duration,
        result_count: usize,
    ) -> Self {
        Self {
            query: query.into(),
            query_type,
            engines,
            fusion_policy: None,
            latency,
            result_count,
            degraded: false,
            logged_at: Utc::now(),
        }
    }

    pub fn with_fusion(mut self, policy: FusionPolicy) -> Self {
        self.fusion_policy = Some(policy);
        self
    }

    pub fn with_degraded(mut self, degraded: bool) -> Self {
        self.degraded = degraded;
        self
    }
}

/// Latency summary over the retained window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencyStats {
    pub mean: Duration,
    pub p50: Duration,
    pub p95: Duration,
    pub max: Duration,
}

/// Ring of the most recent queries. Pushing onto a full log drops the oldest.
#[derive(Debug, Clone)]
pub struct QueryLog {
    window: VecDeque<QueryLogEntry>,
    capacity: usize,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUERY_LOG_CAPACITY)
    }

    /// A capacity of 0 is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::new(),
            capacity,
        }
    }

    pub fn record(&mut self, entry: QueryLogEntry) {
        trace!(
            query_type = %entry.query_type,
            results = entry.result_count,
            latency_us = entry.latency.as_micros() as u64,
            "query log append"
        );
        while self.window.len() >= self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(entry);
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &QueryLogEntry> {
        self.window.iter()
    }

    fn sorted_latencies(&self) -> Vec<Duration> {
        let mut latencies: Vec<Duration> = self.window.iter().map(|e| e.latency).collect();
        latencies.sort_unstable();
        latencies
    }

    pub fn avg_latency(&self) -> Duration {
        match u32::try_from(self.window.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.window.iter().map(|e| e.latency).sum::<Duration>() / n,
        }
    }

    /// Nearest-rank latency for `p` in [0, 1]; out-of-range `p` is clamped.
    pub fn latency_percentile(&self, p: f64) -> Duration {
        percentile(&self.sorted_latencies(), p)
    }

    pub fn latency_stats(&self) -> LatencyStats {
        let sorted = self.sorted_latencies();
        LatencyStats {
            mean: self.avg_latency(),
            p50: percentile(&sorted, 0.5),
            p95: percentile(&sorted, 0.95),
            max: sorted.last().copied().unwrap_or_default(),
        }
    }

    /// Share of retained queries answered in degraded mode.
    pub fn degraded_rate(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.window.iter().filter(|e| e.degraded).count() as f64 / self.window.len() as f64
        }
    }

    pub fn count_by_query_type(&self) -> HashMap<QueryType, usize> {
        self.window.iter().fold(HashMap::new(), |mut acc, e| {
            *acc.entry(e.query_type).or_default() += 1;
            acc
        })
    }

    /// How often each engine was invoked.
    pub fn count_by_engine(&self) -> HashMap<EngineKind, usize> {
        let mut acc = HashMap::new();
        for engine in self.window.iter().flat_map(|e| &e.engines) {
            *acc.entry(*engine).or_default() += 1;
        }
        acc
    }

    pub fn count(&self) -> usize {
        self.window.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let Some(last) = sorted.len().checked_sub(1) else {
        return Duration::ZERO;
    };
    let rank = (p.clamp(0.0, 1.0) * last as f64).round() as usize;
    sorted[rank.min(last)]
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::new()
    }
}
