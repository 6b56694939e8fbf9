use lethe_core::errors::SimilarityError;
use lethe_core::traits::{IQueryEncoder, ISimilarity};

/// Deterministic bag-of-words encoder.
///
/// Each lowercase alphanumeric token is hashed with blake3 into one of
/// `dims` buckets with a ±1 sign, and the result is L2-normalised. Texts
/// sharing tokens get a positive cosine, unrelated texts land near zero.
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dims: usize,
}

impl HashingEncoder {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self::new(64)
    }
}

impl IQueryEncoder for HashingEncoder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, SimilarityError> {
        let mut v = vec![0.0f32; self.dims];
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = blake3::hash(token.as_bytes());
            let bytes = hash.as_bytes();
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[..8]);
            let bucket = (u64::from_le_bytes(word) % self.dims as u64) as usize;
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "blake3-hashing"
    }
}

/// Encoder that always fails, for degraded-mode tests.
#[derive(Debug, Clone, Default)]
pub struct FailingEncoder;

impl IQueryEncoder for FailingEncoder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, SimilarityError> {
        Err(SimilarityError::EncodingFailed {
            reason: "encoder offline".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        64
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Similarity provider that is always unavailable.
#[derive(Debug, Clone, Default)]
pub struct FailingSimilarity;

impl ISimilarity for FailingSimilarity {
    fn similarity(&self, _query: &[f32], _candidate: &[f32]) -> Result<f64, SimilarityError> {
        Err(SimilarityError::Unavailable {
            reason: "similarity backend down".to_string(),
        })
    }

    fn is_available(&self) -> bool {
        false
    }
}
