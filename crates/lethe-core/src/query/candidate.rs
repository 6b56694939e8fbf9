use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EngineKind, QueryType};

/// One ranked candidate produced by a retrieval engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Raw issue id.
    pub candidate_id: String,
    pub raw_score: f64,
    /// Raw ids of the entities backing this candidate.
    pub evidence_ids: Vec<String>,
}

impl Candidate {
    pub fn new(candidate_id: impl Into<String>, raw_score: f64) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            raw_score,
            evidence_ids: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence_ids: Vec<String>) -> Self {
        self.evidence_ids = evidence_ids;
        self
    }
}

/// A finite ranked list from one engine, descending by `raw_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    pub engine: EngineKind,
    pub candidates: Vec<Candidate>,
    /// Set when an injected collaborator failed and the list is partial or empty.
    pub degraded: bool,
    pub reason: Option<String>,
}

impl EngineOutput {
    pub fn new(engine: EngineKind, candidates: Vec<Candidate>) -> Self {
        Self {
            engine,
            candidates,
            degraded: false,
            reason: None,
        }
    }

    pub fn empty(engine: EngineKind) -> Self {
        Self::new(engine, Vec::new())
    }

    pub fn degraded(engine: EngineKind, reason: impl Into<String>) -> Self {
        Self {
            engine,
            candidates: Vec::new(),
            degraded: true,
            reason: Some(reason.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

/// Input handed to an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineQuery {
    pub text: String,
    pub top_k: usize,
    pub query_type: Option<QueryType>,
    /// Evaluation time for time-dependent scoring.
    pub now: DateTime<Utc>,
}

impl EngineQuery {
    pub fn new(text: impl Into<String>, top_k: usize) -> Self {
        Self {
            text: text.into(),
            top_k,
            query_type: None,
            now: Utc::now(),
        }
    }

    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = Some(query_type);
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// One item of the final ranked output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub candidate_id: String,
    pub score: f64,
    pub evidence_ids: Vec<String>,
    pub engine_used: EngineKind,
    pub query_type: QueryType,
    pub degraded_mode: bool,
}
