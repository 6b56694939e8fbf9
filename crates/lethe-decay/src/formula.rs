use chrono::{DateTime, Utc};
use serde::Serialize;

use lethe_core::Issue;

use crate::factors;
use crate::weights::ForgettingWeights;

/// Weighted additive forgetting formula.
///
/// ```text
/// score = w_u × usage + w_r × recency + w_v × relevance
/// ```
///
/// With valid weights and `relevance ∈ [-1, 1]` the result lies in [-1, 1].
pub fn compute(
    issue: &Issue,
    relevance: f64,
    now: DateTime<Utc>,
    weights: &ForgettingWeights,
    decay_rate: f64,
) -> f64 {
    let usage = factors::usage::calculate(issue);
    let recency = factors::recency::calculate(issue, now, decay_rate);
    combine(weights, usage, recency, relevance)
}

/// The usage and recency part only: the score an issue has with zero relevance.
pub fn compute_static(
    issue: &Issue,
    now: DateTime<Utc>,
    weights: &ForgettingWeights,
    decay_rate: f64,
) -> f64 {
    compute(issue, 0.0, now, weights, decay_rate)
}

fn combine(weights: &ForgettingWeights, usage: f64, recency: f64, relevance: f64) -> f64 {
    weights.usage() * usage + weights.recency() * recency + weights.relevance() * relevance
}

/// Each factor of one score, for debugging and observability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForgettingBreakdown {
    pub usage: f64,
    pub recency: f64,
    pub relevance: f64,
    pub weights: ForgettingWeights,
    /// Relevance was unavailable and counted as 0.
    pub degraded: bool,
    pub score: f64,
}

/// Compute the score with a full breakdown.
///
/// `relevance = None` means the similarity collaborator failed: relevance is
/// taken as 0 and the breakdown is flagged degraded.
pub fn compute_breakdown(
    issue: &Issue,
    relevance: Option<f64>,
    now: DateTime<Utc>,
    weights: &ForgettingWeights,
    decay_rate: f64,
) -> ForgettingBreakdown {
    let usage = factors::usage::calculate(issue);
    let recency = factors::recency::calculate(issue, now, decay_rate);
    let (relevance, degraded) = match relevance {
        Some(r) if !r.is_nan() => (r.clamp(-1.0, 1.0), false),
        _ => (0.0, true),
    };
    ForgettingBreakdown {
        usage,
        recency,
        relevance,
        weights: *weights,
        degraded,
        score: combine(weights, usage, recency, relevance),
    }
}
