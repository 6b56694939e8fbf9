use serde::{Deserialize, Serialize};

use super::defaults;

/// Forgetting-score configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgettingConfig {
    pub usage_weight: f64,
    pub recency_weight: f64,
    pub relevance_weight: f64,
    /// Recency decay rate λ (per year).
    pub decay_rate: f64,
    /// Score below which an issue is reported as forgotten.
    pub retention_threshold: f64,
    /// Use per-query-type weight presets (temporal, author) instead of the fixed weights.
    pub query_type_weights: bool,
}

impl Default for ForgettingConfig {
    fn default() -> Self {
        Self {
            usage_weight: defaults::DEFAULT_USAGE_WEIGHT,
            recency_weight: defaults::DEFAULT_RECENCY_WEIGHT,
            relevance_weight: defaults::DEFAULT_RELEVANCE_WEIGHT,
            decay_rate: defaults::DEFAULT_DECAY_RATE,
            retention_threshold: defaults::DEFAULT_RETENTION_THRESHOLD,
            query_type_weights: defaults::DEFAULT_QUERY_TYPE_WEIGHTS,
        }
    }
}
