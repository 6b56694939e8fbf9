use crate::errors::SimilarityError;

/// Pluggable similarity over two fixed-length vectors.
///
/// Implementations must return a value in [-1, 1]. The core never computes
/// embeddings itself; it only compares the vectors it is handed.
pub trait ISimilarity: Send + Sync {
    fn similarity(&self, query: &[f32], candidate: &[f32]) -> Result<f64, SimilarityError>;

    /// Whether the provider can currently answer.
    fn is_available(&self) -> bool {
        true
    }
}

/// Cosine similarity. Zero vectors compare as 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl ISimilarity for CosineSimilarity {
    fn similarity(&self, query: &[f32], candidate: &[f32]) -> Result<f64, SimilarityError> {
        if query.len() != candidate.len() {
            return Err(SimilarityError::DimensionMismatch {
                expected: query.len(),
                actual: candidate.len(),
            });
        }

        let mut dot = 0.0f64;
        let mut norm_q = 0.0f64;
        let mut norm_c = 0.0f64;
        for (q, c) in query.iter().zip(candidate) {
            let (q, c) = (*q as f64, *c as f64);
            dot += q * c;
            norm_q += q * q;
            norm_c += c * c;
        }

        let denom = norm_q.sqrt() * norm_c.sqrt();
        if denom == 0.0 || !denom.is_finite() {
            return Ok(0.0);
        }
        Ok((dot / denom).clamp(-1.0, 1.0))
    }
}
