//! Forgetting-weighted engine: re-scores the similarity ranking with the
//! forgetting score.
//!
//! ```text
//! final = 0.6 * raw / max_raw + 0.4 * forgetting_score
//! ```
//!
//! Every candidate of the similarity ranking is re-scored; negative raw
//! similarities normalise to 0. Candidates whose final score is below the
//! current threshold are dropped. The threshold starts at `min_final_score`
//! and follows observed performance through an [`AdaptiveThreshold`].
//!
//! Identifier and author queries are answered from the graph first: issues
//! referencing the named entity (or carrying the named id), or written by the
//! named author, count as exact matches (`raw / max_raw = 1`). Without such a
//! match the similarity path runs.
//!
//! When similarity is unavailable the relevance term is zeroed: every issue
//! is scored on usage and recency alone and the output is flagged degraded.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use lethe_core::config::RetrievalConfig;
use lethe_core::constants::{FORGETTING_BLEND_RAW, FORGETTING_BLEND_SCORE};
use lethe_core::traits::IRetrievalEngine;
use lethe_core::{Candidate, EngineKind, EngineOutput, EngineQuery, Issue, QueryType};
use lethe_decay::{AdaptiveThreshold, ForgettingScorer};
use lethe_graph::GraphStore;

use crate::intent::classifier::{extract_author_handles, extract_identifiers};
use crate::similarity::SimilarityEngine;

pub struct ForgettingEngine {
    graph: Arc<GraphStore>,
    similarity: Arc<SimilarityEngine>,
    scorer: ForgettingScorer,
    min_final_score: f64,
    threshold: Mutex<AdaptiveThreshold>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ForgettingEngine {
    pub fn new(
        graph: Arc<GraphStore>,
        similarity: Arc<SimilarityEngine>,
        scorer: ForgettingScorer,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            graph,
            similarity,
            scorer,
            min_final_score: config.min_final_score,
            threshold: Mutex::new(AdaptiveThreshold::containing(config.min_final_score)),
        }
    }

    pub fn scorer(&self) -> &ForgettingScorer {
        &self.scorer
    }

    /// The configured starting threshold.
    pub fn min_final_score(&self) -> f64 {
        self.min_final_score
    }

    /// The threshold currently applied to final scores.
    pub fn threshold(&self) -> f64 {
        lock(&self.threshold).threshold()
    }

    /// Feed one performance value (an outcome confidence in [0,1]) into the
    /// threshold. Returns the threshold now in force.
    pub fn observe(&self, performance: f64) -> f64 {
        lock(&self.threshold).record(performance)
    }

    pub fn threshold_state(&self) -> AdaptiveThreshold {
        lock(&self.threshold).clone()
    }

    pub fn restore_threshold(&self, state: AdaptiveThreshold) {
        *lock(&self.threshold) = state;
    }

    pub fn reset_threshold(&self) {
        lock(&self.threshold).reset();
    }

    /// Issues named by an identifier or author query, with their evidence.
    /// `None` when the query names nothing the graph knows.
    fn lookup(&self, query: &EngineQuery) -> Option<Vec<(Issue, Vec<String>)>> {
        let mut found: BTreeMap<String, (Issue, Vec<String>)> = BTreeMap::new();
        match query.query_type {
            Some(QueryType::Identifier) => {
                for id in extract_identifiers(&query.text) {
                    if let Some(issue) = self.graph.issue(&id) {
                        let evidence = issue.references.iter().cloned().collect();
                        found.entry(issue.id.clone()).or_insert((issue, evidence));
                    }
                    for issue in self.graph.issues_referencing(&id) {
                        let slot = found
                            .entry(issue.id.clone())
                            .or_insert_with(|| (issue, Vec::new()));
                        if !slot.1.contains(&id) {
                            slot.1.push(id.clone());
                        }
                    }
                }
            }
            Some(QueryType::Author) => {
                for handle in extract_author_handles(&query.text) {
                    for issue in self.graph.issues_by_author(&handle) {
                        let evidence = issue.references.iter().cloned().collect();
                        found.entry(issue.id.clone()).or_insert((issue, evidence));
                    }
                }
            }
            _ => return None,
        }
        (!found.is_empty()).then(|| found.into_values().collect())
    }

    fn score_matches(
        &self,
        query: &EngineQuery,
        matches: Vec<(Issue, Vec<String>)>,
        threshold: f64,
    ) -> Vec<Candidate> {
        matches
            .into_iter()
            .filter_map(|(issue, evidence)| {
                let forgetting =
                    self.scorer
                        .score_for_type(&issue, Some(1.0), query.query_type, query.now);
                let score = final_score(1.0, forgetting.score);
                (score >= threshold)
                    .then(|| Candidate::new(issue.id, score).with_evidence(evidence))
            })
            .collect()
    }

    /// Usage and recency only, for when similarity is unavailable.
    fn score_without_relevance(&self, query: &EngineQuery, threshold: f64) -> Vec<Candidate> {
        self.graph
            .issues()
            .filter_map(|issue| {
                let forgetting = self
                    .scorer
                    .score_for_type(&issue, None, query.query_type, query.now);
                let score = final_score(0.0, forgetting.score);
                (score >= threshold).then(|| {
                    let evidence = issue.references.iter().cloned().collect();
                    Candidate::new(issue.id, score).with_evidence(evidence)
                })
            })
            .collect()
    }
}

/// `raw / max_raw`, with negatives and a non-positive maximum mapping to 0.
pub fn normalize_raw(raw: f64, max_raw: f64) -> f64 {
    if max_raw <= 0.0 || raw <= 0.0 {
        0.0
    } else {
        (raw / max_raw).min(1.0)
    }
}

/// Blend a normalised similarity with a forgetting score.
pub fn final_score(normalized: f64, forgetting: f64) -> f64 {
    FORGETTING_BLEND_RAW * normalized + FORGETTING_BLEND_SCORE * forgetting
}

fn rank(mut candidates: Vec<Candidate>, top_k: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.raw_score
            .partial_cmp(&a.raw_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
    candidates.truncate(top_k);
    candidates
}

impl IRetrievalEngine for ForgettingEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Forgetting
    }

    fn query_with(&self, query: &EngineQuery) -> EngineOutput {
        if query.top_k == 0 {
            return EngineOutput::empty(EngineKind::Forgetting);
        }
        let threshold = self.threshold();

        if let Some(matches) = self.lookup(query) {
            let found = matches.len();
            let candidates = rank(self.score_matches(query, matches, threshold), query.top_k);
            debug!(found, kept = candidates.len(), threshold, "forgetting-weighted graph lookup");
            return EngineOutput::new(EngineKind::Forgetting, candidates);
        }

        let base = self
            .similarity
            .rank(&query.text, self.similarity.index().len());
        if base.degraded {
            let candidates = rank(self.score_without_relevance(query, threshold), query.top_k);
            warn!(
                kept = candidates.len(),
                reason = base.reason.as_deref().unwrap_or_default(),
                "similarity degraded, ranking on usage and recency"
            );
            return EngineOutput {
                engine: EngineKind::Forgetting,
                candidates,
                degraded: true,
                reason: base.reason,
            };
        }

        let fetched = base.candidates.len();
        let max_raw = base
            .candidates
            .iter()
            .map(|c| c.raw_score)
            .fold(f64::NEG_INFINITY, f64::max);

        let rescored: Vec<Candidate> = base
            .candidates
            .into_iter()
            .filter_map(|c| {
                let issue = self.graph.issue(&c.candidate_id)?;
                let forgetting = self.scorer.score_for_type(
                    &issue,
                    Some(c.raw_score),
                    query.query_type,
                    query.now,
                );
                let score = final_score(normalize_raw(c.raw_score, max_raw), forgetting.score);
                (score >= threshold).then_some(Candidate { raw_score: score, ..c })
            })
            .collect();
        let candidates = rank(rescored, query.top_k);

        debug!(fetched, kept = candidates.len(), threshold, "forgetting-weighted query");
        EngineOutput::new(EngineKind::Forgetting, candidates)
    }
}
