use serde::{Deserialize, Serialize};

use super::defaults;

/// Adaptive selector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Exploration probability.
    pub epsilon: f64,
    /// Observations needed before a key starts exploiting.
    pub min_samples: usize,
    /// Ring-buffer capacity per (arm, query type) key.
    pub window_capacity: usize,
    /// Step size used by `adapt_weights`.
    pub learning_rate: f64,
    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            epsilon: defaults::DEFAULT_EPSILON,
            min_samples: defaults::DEFAULT_MIN_SAMPLES,
            window_capacity: defaults::DEFAULT_WINDOW_CAPACITY,
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            seed: None,
        }
    }
}
