use crate::query::{EngineKind, EngineOutput, EngineQuery};

/// A retrieval engine producing a ranked candidate list for a query.
///
/// Never fails: no candidates yields an empty output, a broken collaborator
/// yields a degraded one.
pub trait IRetrievalEngine: Send + Sync {
    fn kind(&self) -> EngineKind;

    fn query_with(&self, query: &EngineQuery) -> EngineOutput;

    fn query(&self, text: &str, top_k: usize) -> EngineOutput {
        self.query_with(&EngineQuery::new(text, top_k))
    }

    /// Map one of this engine's raw scores onto a [0,1] confidence, so
    /// outcomes of engines with different score scales are comparable.
    ///
    /// The default suits engines already scoring in [0,1] or [-1,1].
    fn calibrate(&self, raw_score: f64) -> f64 {
        if raw_score.is_finite() {
            raw_score.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
