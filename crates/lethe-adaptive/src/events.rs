use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use lethe_core::QueryType;

/// Published on every `record_outcome`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeEvent<A> {
    pub arm: A,
    pub query_type: QueryType,
    pub success: bool,
    pub confidence: f64,
    pub latency: Duration,
    /// Samples held for the key after this outcome.
    pub window_len: usize,
    pub recorded_at: DateTime<Utc>,
}
