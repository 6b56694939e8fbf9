use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NodeId;

/// Lifecycle status of a collaboration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time-stamped collaboration / change record.
///
/// As an ingestion record `access_count` and `last_accessed` seed the usage
/// history. Inside the graph store they are live counters and this struct is
/// only ever handed out as a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Issue {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: IssueStatus,
    #[serde(default)]
    pub author: String,
    pub created_at: DateTime<Utc>,
    /// Raw ids of referenced entities.
    #[serde(default)]
    pub references: BTreeSet<String>,
    #[serde(default)]
    pub access_count: u64,
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        status: IssueStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status,
            author: String::new(),
            created_at,
            references: BTreeSet::new(),
            access_count: 0,
            last_accessed: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_reference(mut self, entity_id: impl Into<String>) -> Self {
        self.references.insert(entity_id.into());
        self
    }

    pub fn with_access(mut self, count: u64, last_accessed: Option<DateTime<Utc>>) -> Self {
        self.access_count = count;
        self.last_accessed = last_accessed;
        self
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::issue(&self.id)
    }

    /// Last access time, falling back to creation time when never accessed.
    pub fn last_access_or_creation(&self) -> DateTime<Utc> {
        self.last_accessed.unwrap_or(self.created_at)
    }

    /// Title and description joined, the text representation used for encoding.
    pub fn text(&self) -> String {
        if self.description.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.description)
        }
    }
}
