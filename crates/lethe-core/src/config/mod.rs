pub mod defaults;
pub mod forgetting_config;
pub mod graph_config;
pub mod observability_config;
pub mod retrieval_config;
pub mod selector_config;

pub use forgetting_config::ForgettingConfig;
pub use graph_config::GraphConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::{RetrievalConfig, RetrievalMode};
pub use selector_config::SelectorConfig;

use serde::{Deserialize, Serialize};

use crate::constants::WEIGHT_SUM_TOLERANCE;
use crate::errors::{ConfigError, LetheResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetheConfig {
    pub forgetting: ForgettingConfig,
    pub selector: SelectorConfig,
    pub retrieval: RetrievalConfig,
    pub graph: GraphConfig,
    pub observability: ObservabilityConfig,
}

impl LetheConfig {
    /// Parse from a TOML string and validate. Missing sections use defaults.
    pub fn from_toml(toml_str: &str) -> LetheResult<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value that would otherwise fail later at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.forgetting;
        let weights = [f.usage_weight, f.recency_weight, f.relevance_weight];
        let in_range = weights.iter().all(|w| (0.0..=1.0).contains(w));
        if !in_range || (weights.iter().sum::<f64>() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights {
                usage: f.usage_weight,
                recency: f.recency_weight,
                relevance: f.relevance_weight,
            });
        }
        if !f.decay_rate.is_finite() || f.decay_rate < 0.0 {
            return Err(ConfigError::InvalidDecayRate {
                value: f.decay_rate,
            });
        }
        check_unit("forgetting.retention_threshold", f.retention_threshold)?;

        let s = &self.selector;
        if !(0.0..=1.0).contains(&s.epsilon) {
            return Err(ConfigError::InvalidEpsilon { value: s.epsilon });
        }
        if !(s.learning_rate > 0.0 && s.learning_rate <= 1.0) {
            return Err(ConfigError::InvalidLearningRate {
                value: s.learning_rate,
            });
        }
        check_capacity("selector.window_capacity", s.window_capacity)?;

        let r = &self.retrieval;
        check_capacity("retrieval.default_top_k", r.default_top_k)?;
        check_unit("retrieval.min_final_score", r.min_final_score)?;
        if !r.bm25_k1.is_finite() || r.bm25_k1 < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "retrieval.bm25_k1".to_string(),
                value: r.bm25_k1,
            });
        }
        check_unit("retrieval.bm25_b", r.bm25_b)?;
        if !(r.bm25_confidence_midpoint.is_finite() && r.bm25_confidence_midpoint > 0.0) {
            return Err(ConfigError::InvalidThreshold {
                name: "retrieval.bm25_confidence_midpoint".to_string(),
                value: r.bm25_confidence_midpoint,
            });
        }

        check_unit("graph.reference_weight", self.graph.reference_weight)?;
        check_unit("graph.structural_weight", self.graph.structural_weight)?;

        check_capacity(
            "observability.query_log_capacity",
            self.observability.query_log_capacity,
        )?;
        Ok(())
    }
}

fn check_unit(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold {
            name: name.to_string(),
            value,
        })
    }
}

fn check_capacity(name: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::InvalidCapacity {
            name: name.to_string(),
            value,
        })
    } else {
        Ok(())
    }
}
