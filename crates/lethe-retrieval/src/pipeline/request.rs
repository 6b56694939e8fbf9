use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use lethe_adaptive::SelectionMode;
use lethe_core::{EngineKind, FusionPolicy, QueryType, RankedResult};

/// A query as handed to [`RetrievalPipeline::query`](super::RetrievalPipeline::query).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub text: String,
    /// Bypasses the classifier when set.
    pub query_type: Option<QueryType>,
    /// Falls back to `retrieval.default_top_k`.
    pub top_k: Option<usize>,
    /// Evaluation time for recency and access stamps. Falls back to now.
    pub now: Option<DateTime<Utc>>,
    /// Leave outcome recording to a later `record_feedback` call.
    pub defer_feedback: bool,
}

impl QueryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            query_type: None,
            top_k: None,
            now: None,
            defer_feedback: false,
        }
    }

    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = Some(query_type);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn with_deferred_feedback(mut self) -> Self {
        self.defer_feedback = true;
        self
    }
}

/// The ranked output of one query plus how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    pub results: Vec<RankedResult>,
    pub query_type: QueryType,
    /// Engines invoked, in invocation order.
    pub engines: Vec<EngineKind>,
    /// Concrete policy applied when more than one list was fused.
    pub fusion_policy: Option<FusionPolicy>,
    /// Set when the fusion policy was picked by the adaptive selector.
    pub fusion_selection: Option<SelectionMode>,
    pub degraded: bool,
    /// Why the result is degraded or empty.
    pub reason: Option<String>,
    pub latency: Duration,
}

impl QueryResponse {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn candidate_ids(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.candidate_id.as_str()).collect()
    }
}
