use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, warn};

use lethe_core::config::ForgettingConfig;
use lethe_core::errors::ConfigError;
use lethe_core::traits::{CosineSimilarity, ISimilarity};
use lethe_core::{Issue, QueryType};

use crate::factors;
use crate::formula::{self, ForgettingBreakdown};
use crate::retention::{self, RetentionDecision, RetentionReport};
use crate::weights::ForgettingWeights;

/// A forgetting score together with the factors it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForgettingScore {
    pub score: f64,
    pub breakdown: ForgettingBreakdown,
}

impl ForgettingScore {
    pub fn degraded(&self) -> bool {
        self.breakdown.degraded
    }
}

/// Computes the forgetting score of an issue at query time.
pub struct ForgettingScorer {
    weights: ForgettingWeights,
    decay_rate: f64,
    retention_threshold: f64,
    query_type_weights: bool,
    similarity: Arc<dyn ISimilarity>,
}

impl ForgettingScorer {
    /// Create a scorer with cosine similarity and the default retention threshold.
    pub fn new(weights: ForgettingWeights, decay_rate: f64) -> Result<Self, ConfigError> {
        if !decay_rate.is_finite() || decay_rate < 0.0 {
            return Err(ConfigError::InvalidDecayRate { value: decay_rate });
        }
        Ok(Self {
            weights,
            decay_rate,
            retention_threshold: lethe_core::config::defaults::DEFAULT_RETENTION_THRESHOLD,
            query_type_weights: false,
            similarity: Arc::new(CosineSimilarity),
        })
    }

    pub fn from_config(config: &ForgettingConfig) -> Result<Self, ConfigError> {
        let mut scorer = Self::new(ForgettingWeights::from_config(config)?, config.decay_rate)?;
        scorer.retention_threshold = config.retention_threshold;
        scorer.query_type_weights = config.query_type_weights;
        Ok(scorer)
    }

    /// Replace the similarity collaborator.
    pub fn with_similarity(mut self, similarity: Arc<dyn ISimilarity>) -> Self {
        self.similarity = similarity;
        self
    }

    /// Enable the per-query-type weight presets.
    pub fn with_query_type_weights(mut self, enabled: bool) -> Self {
        self.query_type_weights = enabled;
        self
    }

    pub fn weights(&self) -> ForgettingWeights {
        self.weights
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn retention_threshold(&self) -> f64 {
        self.retention_threshold
    }

    pub fn similarity(&self) -> &dyn ISimilarity {
        self.similarity.as_ref()
    }

    /// Weights to use for a query of the given type.
    pub fn weights_for(&self, query_type: Option<QueryType>) -> ForgettingWeights {
        match query_type {
            Some(qt) if self.query_type_weights => {
                ForgettingWeights::for_query_type(qt, self.weights)
            }
            _ => self.weights,
        }
    }

    /// Score an issue, computing relevance from the two representations.
    ///
    /// A similarity failure is not an error: relevance becomes 0 and the
    /// result is flagged degraded.
    pub fn score(
        &self,
        issue: &Issue,
        query: &[f32],
        candidate: &[f32],
        now: DateTime<Utc>,
    ) -> ForgettingScore {
        let relevance = match factors::relevance::calculate(self.similarity.as_ref(), query, candidate)
        {
            Ok(r) => Some(r),
            Err(err) => {
                warn!(issue = %issue.id, error = %err, "relevance unavailable, scoring degraded");
                None
            }
        };
        self.score_with_relevance(issue, relevance, now)
    }

    /// Score an issue with a relevance the caller already computed.
    /// `None` means relevance is unavailable.
    pub fn score_with_relevance(
        &self,
        issue: &Issue,
        relevance: Option<f64>,
        now: DateTime<Utc>,
    ) -> ForgettingScore {
        self.score_for_type(issue, relevance, None, now)
    }

    /// Like [`score_with_relevance`](Self::score_with_relevance), using the
    /// weights for `query_type` when presets are enabled.
    pub fn score_for_type(
        &self,
        issue: &Issue,
        relevance: Option<f64>,
        query_type: Option<QueryType>,
        now: DateTime<Utc>,
    ) -> ForgettingScore {
        let weights = self.weights_for(query_type);
        let breakdown =
            formula::compute_breakdown(issue, relevance, now, &weights, self.decay_rate);
        debug!(
            issue = %issue.id,
            usage = breakdown.usage,
            recency = breakdown.recency,
            relevance = breakdown.relevance,
            score = breakdown.score,
            "forgetting score"
        );
        ForgettingScore {
            score: breakdown.score,
            breakdown,
        }
    }

    /// Breakdown for an issue with a known relevance.
    pub fn breakdown(
        &self,
        issue: &Issue,
        relevance: Option<f64>,
        now: DateTime<Utc>,
    ) -> ForgettingBreakdown {
        self.score_with_relevance(issue, relevance, now).breakdown
    }

    /// Retention decision against this scorer's threshold.
    pub fn evaluate_retention(&self, issue: &Issue, score: f64) -> RetentionDecision {
        retention::evaluate(issue, score, self.retention_threshold)
    }

    /// Retention over a batch, scored on usage and recency only, in parallel.
    pub fn retention_report(&self, issues: &[Issue], now: DateTime<Utc>) -> RetentionReport {
        self.retention_report_with_threshold(issues, now, self.retention_threshold)
    }

    pub fn retention_report_with_threshold(
        &self,
        issues: &[Issue],
        now: DateTime<Utc>,
        threshold: f64,
    ) -> RetentionReport {
        let decisions: Vec<RetentionDecision> = issues
            .par_iter()
            .map(|issue| {
                let score = formula::compute_static(issue, now, &self.weights, self.decay_rate);
                retention::evaluate(issue, score, threshold)
            })
            .collect();
        RetentionReport::from_decisions(decisions, threshold)
    }
}
