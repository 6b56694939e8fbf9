//! FusionEngine: merge ranked lists under a fusion policy.
//!
//! `Adaptive` is resolved per query by its own
//! `AdaptiveSelector<FusionPolicy>` over `{Basic, Weighted}`, keyed by query
//! type and independent of engine selection.

pub mod merge;

use std::time::Duration;

use tracing::debug;

use lethe_adaptive::{AdaptiveSelector, SelectionMode};
use lethe_core::config::SelectorConfig;
use lethe_core::errors::ConfigError;
use lethe_core::{EngineKind, EngineOutput, FusionPolicy, QueryType};
use lethe_observability::{fusion_span, selection_span};

pub use merge::{fuse_basic, fuse_weighted, FusedCandidate};

/// Policies the adaptive mode chooses between.
pub const ADAPTIVE_POLICIES: [FusionPolicy; 2] = [FusionPolicy::Basic, FusionPolicy::Weighted];

/// Result of one fusion.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionOutcome {
    /// The concrete policy applied (never `Adaptive`).
    pub policy: FusionPolicy,
    /// How the policy was picked, when it was picked adaptively.
    pub selection: Option<SelectionMode>,
    pub candidates: Vec<FusedCandidate>,
}

pub struct FusionEngine {
    policy: FusionPolicy,
    selector: AdaptiveSelector<FusionPolicy>,
}

impl FusionEngine {
    pub fn new(policy: FusionPolicy, config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            policy,
            selector: AdaptiveSelector::new(ADAPTIVE_POLICIES.to_vec(), config)?,
        })
    }

    pub fn policy(&self) -> FusionPolicy {
        self.policy
    }

    pub fn selector(&self) -> &AdaptiveSelector<FusionPolicy> {
        &self.selector
    }

    /// The concrete policy for this query, and how it was chosen.
    pub fn resolve(&self, query_type: QueryType) -> (FusionPolicy, Option<SelectionMode>) {
        match self.policy {
            FusionPolicy::Adaptive => {
                let choice = self.selector.select(query_type);
                let _span = selection_span!(choice, query_type).entered();
                debug!(policy = %choice.arm, mode = %choice.mode, "fusion policy selected");
                (choice.arm, Some(choice.mode))
            }
            fixed => (fixed, None),
        }
    }

    /// Merge `lists` into at most `top_k` items. `weight` supplies the
    /// per-engine multiplier used by the weighted policy.
    pub fn fuse(
        &self,
        lists: &[EngineOutput],
        weight: impl Fn(EngineKind) -> f64,
        query_type: QueryType,
        top_k: usize,
    ) -> FusionOutcome {
        let (policy, selection) = self.resolve(query_type);
        let _span = fusion_span!(policy, lists.len()).entered();

        let candidates = match policy {
            FusionPolicy::Weighted => fuse_weighted(lists, weight, top_k),
            _ => fuse_basic(lists, top_k),
        };
        debug!(fused = candidates.len(), "lists fused");
        FusionOutcome {
            policy,
            selection,
            candidates,
        }
    }

    /// Feed the outcome of an adaptively chosen policy back to its selector.
    /// Fixed policies have no history.
    pub fn record_outcome(
        &self,
        outcome: &FusionOutcome,
        query_type: QueryType,
        success: bool,
        confidence: f64,
        latency: Duration,
    ) {
        if outcome.selection.is_some() {
            self.selector
                .record_outcome(outcome.policy, query_type, success, confidence, latency);
        }
    }
}
