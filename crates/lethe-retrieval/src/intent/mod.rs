//! QueryClassifier: map a raw query to one query-type tag.

pub mod classifier;

use lethe_core::QueryType;

/// Stateless classifier over the fixed rule table.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryClassifier;

impl QueryClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, query: &str) -> QueryType {
        classifier::classify(query)
    }

    /// An explicit override bypasses the rule table.
    pub fn classify_with_override(&self, query: &str, query_type: Option<QueryType>) -> QueryType {
        query_type.unwrap_or_else(|| self.classify(query))
    }
}
