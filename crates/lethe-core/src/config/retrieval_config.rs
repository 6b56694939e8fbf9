use serde::{Deserialize, Serialize};

use super::defaults;
use crate::query::FusionPolicy;

/// Whether the pipeline invokes one selected engine or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    Single,
    Hybrid,
}

/// Retrieval pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_top_k: usize,
    /// Forgetting-weighted results below this final score are dropped.
    pub min_final_score: f64,
    pub mode: RetrievalMode,
    pub fusion_policy: FusionPolicy,
    /// Run `adapt_weights` every this many queries. 0 disables it.
    pub adapt_every: u64,
    pub bm25_k1: f64,
    pub bm25_b: f64,
    /// Lexical scores are mapped to confidence as `s / (s + midpoint)`.
    pub bm25_confidence_midpoint: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: defaults::DEFAULT_TOP_K,
            min_final_score: defaults::DEFAULT_MIN_FINAL_SCORE,
            mode: RetrievalMode::Single,
            fusion_policy: FusionPolicy::Basic,
            adapt_every: defaults::DEFAULT_ADAPT_EVERY,
            bm25_k1: defaults::DEFAULT_BM25_K1,
            bm25_b: defaults::DEFAULT_BM25_B,
            bm25_confidence_midpoint: defaults::DEFAULT_BM25_CONFIDENCE_MIDPOINT,
        }
    }
}
