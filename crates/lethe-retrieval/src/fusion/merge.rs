//! Score-based merging of ranked lists.
//!
//! Lists are concatenated in the order given. A candidate seen more than once
//! keeps its highest score (the first occurrence wins on equal scores), the
//! engine that produced that score, and the union of evidence ids in first-seen
//! order. A stable descending sort then leaves equal scores in first-appearance
//! order.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lethe_core::{EngineKind, EngineOutput};

/// A candidate after fusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedCandidate {
    pub candidate_id: String,
    pub score: f64,
    pub evidence_ids: Vec<String>,
    pub engine: EngineKind,
}

/// Concatenate, dedupe, stable-sort by own score, truncate. No renormalisation.
pub fn fuse_basic(lists: &[EngineOutput], top_k: usize) -> Vec<FusedCandidate> {
    fuse_scaled(lists, |_| 1.0, top_k)
}

/// Like [`fuse_basic`] with every score multiplied by its engine's weight first.
pub fn fuse_weighted(
    lists: &[EngineOutput],
    weight: impl Fn(EngineKind) -> f64,
    top_k: usize,
) -> Vec<FusedCandidate> {
    fuse_scaled(lists, weight, top_k)
}

fn fuse_scaled(
    lists: &[EngineOutput],
    weight: impl Fn(EngineKind) -> f64,
    top_k: usize,
) -> Vec<FusedCandidate> {
    let mut merged: Vec<FusedCandidate> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for list in lists {
        let w = weight(list.engine);
        for candidate in &list.candidates {
            let score = candidate.raw_score * w;
            match slots.get(candidate.candidate_id.as_str()) {
                Some(&i) => {
                    let item = &mut merged[i];
                    for id in &candidate.evidence_ids {
                        if !item.evidence_ids.contains(id) {
                            item.evidence_ids.push(id.clone());
                        }
                    }
                    if score > item.score {
                        item.score = score;
                        item.engine = list.engine;
                    }
                }
                None => {
                    slots.insert(candidate.candidate_id.as_str(), merged.len());
                    merged.push(FusedCandidate {
                        candidate_id: candidate.candidate_id.clone(),
                        score,
                        evidence_ids: candidate.evidence_ids.clone(),
                        engine: list.engine,
                    });
                }
            }
        }
    }

    // `sort_by` is stable: equal scores keep first-appearance order.
    merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    merged.truncate(top_k);
    merged
}
