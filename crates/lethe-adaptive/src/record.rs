use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One observed outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSample {
    pub success: bool,
    /// Clamped to [0, 1].
    pub confidence: f64,
    pub latency: Duration,
}

/// Ring buffer of the most recent outcomes for one key.
///
/// Never holds more than `capacity` samples; pushing into a full record
/// evicts the oldest one.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    samples: VecDeque<OutcomeSample>,
    capacity: usize,
}

impl PerformanceRecord {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// O(1) append.
    pub fn push(&mut self, sample: OutcomeSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &OutcomeSample> {
        self.samples.iter()
    }

    pub fn confidence_sum(&self) -> f64 {
        self.samples.iter().map(|s| s.confidence).sum()
    }

    pub fn mean_confidence(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.confidence_sum() / self.samples.len() as f64
    }

    pub fn success_rate(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().filter(|s| s.success).count() as f64 / self.samples.len() as f64
    }

    pub fn mean_latency(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().map(|s| s.latency).sum();
        total / self.samples.len() as u32
    }

    /// Composite score:
    /// `0.4 × mean confidence + 0.3 × min(1, n / 10) + 0.3 × max(0, 1 − latency_s / 5)`.
    pub fn performance_score(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let volume = (self.samples.len() as f64 / 10.0).min(1.0);
        let speed = (1.0 - self.mean_latency().as_secs_f64() / 5.0).max(0.0);
        self.mean_confidence() * 0.4 + volume * 0.3 + speed * 0.3
    }
}
