use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of query classification tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Direct lookup by a GUID / UUID token.
    Identifier,
    /// Time-bounded question ("recent", "created", "2 weeks ago").
    Temporal,
    /// Question scoped to a person.
    Author,
    /// Plain keyword search. The fallback tag.
    Keyword,
    /// Multi-clause question joined by conjunctions.
    Complex,
    /// Question about links between elements and issues.
    Relationship,
}

impl QueryType {
    pub const ALL: [QueryType; 6] = [
        Self::Identifier,
        Self::Temporal,
        Self::Author,
        Self::Keyword,
        Self::Complex,
        Self::Relationship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Temporal => "temporal",
            Self::Author => "author",
            Self::Keyword => "keyword",
            Self::Complex => "complex",
            Self::Relationship => "relationship",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
