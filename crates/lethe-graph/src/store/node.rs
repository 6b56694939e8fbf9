use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

use lethe_core::{Entity, Issue, NodeId};

/// Sentinel for "never accessed".
const NEVER: i64 = i64::MIN;

/// A node in the knowledge graph.
#[derive(Debug)]
pub enum GraphNode {
    Entity(Entity),
    Issue(IssueNode),
}

impl GraphNode {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Entity(entity) => entity.node_id(),
            Self::Issue(node) => node.issue().node_id(),
        }
    }
}

/// An issue with live, lock-free usage counters.
///
/// The stored `Issue` holds the descriptive attributes; its own
/// `access_count` / `last_accessed` fields are only read at construction.
#[derive(Debug)]
pub struct IssueNode {
    issue: Issue,
    access_count: AtomicU64,
    /// Milliseconds since the epoch, or `NEVER`.
    last_access_ms: AtomicI64,
}

impl IssueNode {
    pub fn new(issue: Issue) -> Self {
        let last = issue
            .last_accessed
            .map(|t| t.timestamp_millis())
            .unwrap_or(NEVER);
        Self {
            access_count: AtomicU64::new(issue.access_count),
            last_access_ms: AtomicI64::new(last),
            issue,
        }
    }

    /// Descriptive attributes. Counter fields may be stale; use [`snapshot`](Self::snapshot).
    pub fn issue(&self) -> &Issue {
        &self.issue
    }

    pub fn id(&self) -> &str {
        &self.issue.id
    }

    pub fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::Acquire)
    }

    pub fn last_accessed(&self) -> Option<DateTime<Utc>> {
        match self.last_access_ms.load(Ordering::Acquire) {
            NEVER => None,
            ms => Utc.timestamp_millis_opt(ms).single(),
        }
    }

    /// Increment the counter and advance last-access to `at`.
    ///
    /// Uses `fetch_max` so concurrent writers with out-of-order timestamps
    /// never move the timestamp backwards.
    pub fn record_access(&self, at: DateTime<Utc>) {
        self.access_count.fetch_add(1, Ordering::AcqRel);
        self.last_access_ms
            .fetch_max(at.timestamp_millis(), Ordering::AcqRel);
    }

    /// Copy of the issue with the current counter values.
    pub fn snapshot(&self) -> Issue {
        let mut issue = self.issue.clone();
        issue.access_count = self.access_count();
        issue.last_accessed = self.last_accessed();
        issue
    }

    pub(crate) fn overwrite_attributes(&mut self, other: &Issue) {
        self.issue.title = other.title.clone();
        self.issue.description = other.description.clone();
        self.issue.status = other.status;
        self.issue.author = other.author.clone();
        self.issue.created_at = other.created_at;
    }

    pub(crate) fn add_reference(&mut self, entity_id: &str) {
        self.issue.references.insert(entity_id.to_string());
    }
}
