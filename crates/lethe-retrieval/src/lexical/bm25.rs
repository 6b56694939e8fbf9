//! Okapi BM25 term weighting.

use lethe_core::config::defaults;
use lethe_core::traits::{ITermWeighting, TermStats};

/// BM25 with the non-negative (Lucene) idf:
/// `idf = ln(1 + (N - df + 0.5) / (df + 0.5))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25 {
    pub k1: f64,
    pub b: f64,
}

impl Bm25 {
    pub fn new(k1: f64, b: f64) -> Self {
        Self { k1, b }
    }

    pub fn idf(&self, df: u32, n_docs: u32) -> f64 {
        let (df, n) = (df as f64, n_docs as f64);
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln().max(0.0)
    }
}

impl Default for Bm25 {
    fn default() -> Self {
        Self::new(defaults::DEFAULT_BM25_K1, defaults::DEFAULT_BM25_B)
    }
}

impl ITermWeighting for Bm25 {
    fn weight(&self, stats: TermStats) -> f64 {
        if stats.tf == 0 || stats.n_docs == 0 {
            return 0.0;
        }
        let tf = stats.tf as f64;
        let length_ratio = if stats.avg_len > 0.0 {
            stats.doc_len as f64 / stats.avg_len
        } else {
            1.0
        };
        let norm = self.k1 * (1.0 - self.b + self.b * length_ratio);
        self.idf(stats.df, stats.n_docs) * tf * (self.k1 + 1.0) / (tf + norm)
    }

    fn name(&self) -> &str {
        "bm25"
    }
}
