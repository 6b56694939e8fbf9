use crate::errors::SimilarityError;

/// Turns query or candidate text into a fixed-length representation.
pub trait IQueryEncoder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, SimilarityError>;

    /// Length of every vector this encoder produces.
    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }
}
