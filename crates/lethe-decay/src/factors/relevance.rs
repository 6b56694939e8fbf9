use lethe_core::errors::SimilarityError;
use lethe_core::traits::ISimilarity;

/// Relevance factor from the injected similarity function, clamped to [-1, 1].
///
/// A NaN from the provider is treated as a failure.
pub fn calculate(
    similarity: &dyn ISimilarity,
    query: &[f32],
    candidate: &[f32],
) -> Result<f64, SimilarityError> {
    if !similarity.is_available() {
        return Err(SimilarityError::Unavailable {
            reason: "similarity provider reports unavailable".to_string(),
        });
    }
    let value = similarity.similarity(query, candidate)?;
    if value.is_nan() {
        return Err(SimilarityError::Unavailable {
            reason: "similarity provider returned NaN".to_string(),
        });
    }
    Ok(value.clamp(-1.0, 1.0))
}
