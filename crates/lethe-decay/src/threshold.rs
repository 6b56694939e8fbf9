use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lethe_core::config::defaults;

/// Retention threshold that follows observed retrieval performance.
///
/// Keeps the last `window` performance values. Once at least `min_samples`
/// exist, the mean of the most recent `min_samples` decides: below the low
/// water mark the threshold drops by one step (keep more), above the high
/// water mark it rises by one step (forget more). Bounded by floor/ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveThreshold {
    threshold: f64,
    initial: f64,
    floor: f64,
    ceiling: f64,
    history: VecDeque<f64>,
    window: usize,
    min_samples: usize,
}

impl AdaptiveThreshold {
    /// Start at `initial`, clamped to the default floor and ceiling.
    pub fn new(initial: f64) -> Self {
        Self::with_bounds(
            initial,
            defaults::DEFAULT_THRESHOLD_FLOOR,
            defaults::DEFAULT_THRESHOLD_CEILING,
        )
    }

    /// Start at `initial` and move within `[floor, ceiling]`. Swapped bounds
    /// are reordered; `initial` is clamped into them.
    pub fn with_bounds(initial: f64, floor: f64, ceiling: f64) -> Self {
        let (floor, ceiling) = if floor <= ceiling {
            (floor, ceiling)
        } else {
            (ceiling, floor)
        };
        let threshold = initial.clamp(floor, ceiling);
        Self {
            threshold,
            initial: threshold,
            floor,
            ceiling,
            history: VecDeque::with_capacity(defaults::DEFAULT_THRESHOLD_WINDOW),
            window: defaults::DEFAULT_THRESHOLD_WINDOW,
            min_samples: defaults::DEFAULT_THRESHOLD_MIN_SAMPLES,
        }
    }

    /// Start at `initial`, widening the default bounds to include it.
    pub fn containing(initial: f64) -> Self {
        Self::with_bounds(
            initial,
            defaults::DEFAULT_THRESHOLD_FLOOR.min(initial),
            defaults::DEFAULT_THRESHOLD_CEILING.max(initial),
        )
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.floor, self.ceiling)
    }

    pub fn samples(&self) -> usize {
        self.history.len()
    }

    /// Record a performance value and return the (possibly adjusted) threshold.
    /// Non-finite values are ignored.
    pub fn record(&mut self, performance: f64) -> f64 {
        if !performance.is_finite() {
            return self.threshold;
        }
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(performance);

        if self.history.len() < self.min_samples {
            return self.threshold;
        }

        let recent = self
            .history
            .iter()
            .rev()
            .take(self.min_samples)
            .sum::<f64>()
            / self.min_samples as f64;

        let before = self.threshold;
        if recent < defaults::DEFAULT_THRESHOLD_LOW_WATER {
            self.threshold = (self.threshold - defaults::DEFAULT_THRESHOLD_STEP).max(self.floor);
        } else if recent > defaults::DEFAULT_THRESHOLD_HIGH_WATER {
            self.threshold = (self.threshold + defaults::DEFAULT_THRESHOLD_STEP).min(self.ceiling);
        }
        if self.threshold != before {
            debug!(recent, from = before, to = self.threshold, "retention threshold adapted");
        }
        self.threshold
    }

    /// Back to the starting threshold with no history.
    pub fn reset(&mut self) {
        self.threshold = self.initial;
        self.history.clear();
    }
}

impl Default for AdaptiveThreshold {
    fn default() -> Self {
        Self::new(defaults::DEFAULT_RETENTION_THRESHOLD)
    }
}
