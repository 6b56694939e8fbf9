/// Construction-time configuration errors. Always fatal, never recovered silently.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "invalid forgetting weights: usage={usage}, recency={recency}, relevance={relevance} \
         (each must lie in [0,1] and they must sum to 1.0)"
    )]
    InvalidWeights {
        usage: f64,
        recency: f64,
        relevance: f64,
    },

    #[error("invalid epsilon {value}: must lie in [0,1]")]
    InvalidEpsilon { value: f64 },

    #[error("invalid decay rate {value}: must be finite and non-negative")]
    InvalidDecayRate { value: f64 },

    #[error("invalid learning rate {value}: must lie in (0,1]")]
    InvalidLearningRate { value: f64 },

    #[error("invalid capacity for {name}: {value}")]
    InvalidCapacity { name: String, value: usize },

    #[error("invalid threshold for {name}: {value}")]
    InvalidThreshold { name: String, value: f64 },

    #[error("no candidates registered for {name}")]
    EmptyCandidateSet { name: String },
}
