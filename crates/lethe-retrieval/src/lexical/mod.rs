//! Lexical engine: term overlap scored by a pluggable term weighting.

pub mod bm25;
pub mod index;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use lethe_core::config::defaults::DEFAULT_BM25_CONFIDENCE_MIDPOINT;
use lethe_core::config::RetrievalConfig;
use lethe_core::traits::{IRetrievalEngine, ITermWeighting, TermStats};
use lethe_core::{Candidate, EngineKind, EngineOutput, EngineQuery};
use lethe_graph::GraphStore;

pub use bm25::Bm25;
pub use index::LexicalIndex;

use crate::text::tokenize;

/// Deterministic keyword engine. Ties sort by issue id.
pub struct LexicalEngine {
    index: LexicalIndex,
    weighting: Box<dyn ITermWeighting>,
    confidence_midpoint: f64,
}

impl LexicalEngine {
    /// Engine over a prebuilt index, weighted by default BM25.
    pub fn new(index: LexicalIndex) -> Self {
        Self {
            index,
            weighting: Box::new(Bm25::default()),
            confidence_midpoint: DEFAULT_BM25_CONFIDENCE_MIDPOINT,
        }
    }

    /// Build the index from the graph with BM25 parameters from config.
    pub fn from_graph(graph: &GraphStore, config: &RetrievalConfig) -> Self {
        Self::new(LexicalIndex::build(graph))
            .with_weighting(Box::new(Bm25::new(config.bm25_k1, config.bm25_b)))
            .with_confidence_midpoint(config.bm25_confidence_midpoint)
    }

    pub fn with_weighting(mut self, weighting: Box<dyn ITermWeighting>) -> Self {
        self.weighting = weighting;
        self
    }

    /// Score that calibrates to confidence 0.5. Non-positive values are ignored.
    pub fn with_confidence_midpoint(mut self, midpoint: f64) -> Self {
        if midpoint.is_finite() && midpoint > 0.0 {
            self.confidence_midpoint = midpoint;
        }
        self
    }

    pub fn index(&self) -> &LexicalIndex {
        &self.index
    }

    pub fn weighting(&self) -> &dyn ITermWeighting {
        self.weighting.as_ref()
    }
}

impl IRetrievalEngine for LexicalEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Lexical
    }

    fn query_with(&self, query: &EngineQuery) -> EngineOutput {
        if query.top_k == 0 || self.index.is_empty() {
            return EngineOutput::empty(EngineKind::Lexical);
        }

        let mut seen = HashSet::new();
        let terms: Vec<String> = tokenize(&query.text)
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect();

        let n_docs = u32::try_from(self.index.len()).unwrap_or(u32::MAX);
        let avg_len = self.index.avg_len();
        let mut scores: HashMap<usize, f64> = HashMap::new();
        for term in &terms {
            let Some(postings) = self.index.postings.get(term) else {
                continue;
            };
            let df = u32::try_from(postings.len()).unwrap_or(u32::MAX);
            for posting in postings {
                let stats = TermStats {
                    tf: posting.tf,
                    df,
                    doc_len: self.index.docs[posting.doc].len,
                    avg_len,
                    n_docs,
                };
                *scores.entry(posting.doc).or_default() += self.weighting.weight(stats);
            }
        }

        let mut ranked: Vec<(usize, f64)> = scores
            .into_iter()
            .filter(|(_, s)| s.is_finite() && *s > 0.0)
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.index.docs[a.0].id.cmp(&self.index.docs[b.0].id))
        });
        ranked.truncate(query.top_k);

        let candidates: Vec<Candidate> = ranked
            .into_iter()
            .map(|(doc, score)| {
                let doc = &self.index.docs[doc];
                Candidate::new(doc.id.clone(), score).with_evidence(doc.evidence.clone())
            })
            .collect();

        debug!(
            terms = terms.len(),
            hits = candidates.len(),
            weighting = self.weighting.name(),
            "lexical query"
        );
        EngineOutput::new(EngineKind::Lexical, candidates)
    }

    /// Term weights are unbounded, so scores saturate: `s / (s + midpoint)`.
    fn calibrate(&self, raw_score: f64) -> f64 {
        if !raw_score.is_finite() || raw_score <= 0.0 {
            return 0.0;
        }
        raw_score / (raw_score + self.confidence_midpoint)
    }
}
