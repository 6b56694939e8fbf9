/// Failures of the injected similarity / encoding collaborators.
///
/// These never abort a query: engines turn them into a degraded result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimilarityError {
    #[error("similarity provider unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("encoding failed: {reason}")]
    EncodingFailed { reason: String },
}
