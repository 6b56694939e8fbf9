//! Similarity engine: the encoded query against precomputed issue vectors.

pub mod vector_index;

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use lethe_core::traits::{CosineSimilarity, IQueryEncoder, IRetrievalEngine, ISimilarity};
use lethe_core::{Candidate, EngineKind, EngineOutput, EngineQuery};

pub use vector_index::VectorIndex;

/// Ranks issues by an injected similarity function.
///
/// A failing encoder or similarity never surfaces as an error: the output is
/// empty and flagged degraded.
pub struct SimilarityEngine {
    index: VectorIndex,
    encoder: Arc<dyn IQueryEncoder>,
    similarity: Arc<dyn ISimilarity>,
}

impl SimilarityEngine {
    /// Engine using cosine similarity.
    pub fn new(index: VectorIndex, encoder: Arc<dyn IQueryEncoder>) -> Self {
        Self {
            index,
            encoder,
            similarity: Arc::new(CosineSimilarity),
        }
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn ISimilarity>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Up to `limit` issues by descending similarity, ties by id.
    pub fn rank(&self, text: &str, limit: usize) -> EngineOutput {
        if limit == 0 || self.index.is_empty() {
            return EngineOutput::empty(EngineKind::Similarity);
        }
        if !self.similarity.is_available() {
            return degraded("similarity unavailable".to_string());
        }

        let query = match self.encoder.embed(text) {
            Ok(v) => v,
            Err(err) => return degraded(format!("encoder unavailable: {err}")),
        };

        let mut scored = Vec::with_capacity(self.index.len());
        for entry in &self.index.entries {
            match self.similarity.similarity(&query, &entry.vector) {
                Ok(s) if s.is_finite() => scored.push((entry, s.clamp(-1.0, 1.0))),
                Ok(s) => return degraded(format!("similarity returned {s}")),
                Err(err) => return degraded(format!("similarity unavailable: {err}")),
            }
        }

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        scored.truncate(limit);

        let candidates: Vec<Candidate> = scored
            .into_iter()
            .map(|(entry, s)| Candidate::new(entry.id.clone(), s).with_evidence(entry.evidence.clone()))
            .collect();
        debug!(
            encoder = self.encoder.name(),
            hits = candidates.len(),
            "similarity query"
        );
        EngineOutput::new(EngineKind::Similarity, candidates)
    }
}

fn degraded(reason: String) -> EngineOutput {
    warn!(reason = %reason, "similarity engine degraded");
    EngineOutput::degraded(EngineKind::Similarity, reason)
}

impl IRetrievalEngine for SimilarityEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Similarity
    }

    fn query_with(&self, query: &EngineQuery) -> EngineOutput {
        self.rank(&query.text, query.top_k)
    }
}
