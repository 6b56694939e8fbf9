use serde::Serialize;

use lethe_core::config::ForgettingConfig;
use lethe_core::constants::WEIGHT_SUM_TOLERANCE;
use lethe_core::errors::ConfigError;
use lethe_core::QueryType;

/// Validated factor weights. Each lies in [0, 1] and they sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForgettingWeights {
    usage: f64,
    recency: f64,
    relevance: f64,
}

impl ForgettingWeights {
    pub const DEFAULT: ForgettingWeights = ForgettingWeights {
        usage: 0.3,
        recency: 0.4,
        relevance: 0.3,
    };

    /// Time-bounded questions lean on recency.
    pub const TEMPORAL: ForgettingWeights = ForgettingWeights {
        usage: 0.2,
        recency: 0.6,
        relevance: 0.2,
    };

    /// Person-scoped questions lean on usage.
    pub const AUTHOR: ForgettingWeights = ForgettingWeights {
        usage: 0.5,
        recency: 0.3,
        relevance: 0.2,
    };

    pub fn new(usage: f64, recency: f64, relevance: f64) -> Result<Self, ConfigError> {
        let all = [usage, recency, relevance];
        let in_range = all.iter().all(|w| (0.0..=1.0).contains(w));
        let sum: f64 = all.iter().sum();
        if !in_range || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights {
                usage,
                recency,
                relevance,
            });
        }
        Ok(Self {
            usage,
            recency,
            relevance,
        })
    }

    pub fn from_config(config: &ForgettingConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.usage_weight,
            config.recency_weight,
            config.relevance_weight,
        )
    }

    /// Preset for a query type, falling back to `base` for types without one.
    pub fn for_query_type(query_type: QueryType, base: ForgettingWeights) -> ForgettingWeights {
        match query_type {
            QueryType::Temporal => Self::TEMPORAL,
            QueryType::Author => Self::AUTHOR,
            _ => base,
        }
    }

    pub fn usage(&self) -> f64 {
        self.usage
    }

    pub fn recency(&self) -> f64 {
        self.recency
    }

    pub fn relevance(&self) -> f64 {
        self.relevance
    }
}

impl Default for ForgettingWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}
