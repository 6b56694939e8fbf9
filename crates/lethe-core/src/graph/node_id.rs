use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{ENTITY_PREFIX, ISSUE_PREFIX};

/// Namespaced node identifier.
///
/// Entity and issue ids live in separate namespaces, so `Entity("X")` and
/// `Issue("X")` are different nodes. The string form is `entity:<id>` or
/// `issue:<id>`, and the derived ordering matches the lexical order of that form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NodeId {
    Entity(String),
    Issue(String),
}

impl NodeId {
    pub fn entity(id: impl Into<String>) -> Self {
        Self::Entity(id.into())
    }

    pub fn issue(id: impl Into<String>) -> Self {
        Self::Issue(id.into())
    }

    /// The raw identifier without its namespace.
    pub fn raw(&self) -> &str {
        match self {
            Self::Entity(id) | Self::Issue(id) => id,
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Entity(_))
    }

    pub fn is_issue(&self) -> bool {
        matches!(self, Self::Issue(_))
    }

    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Entity(_) => ENTITY_PREFIX,
            Self::Issue(_) => ISSUE_PREFIX,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace(), self.raw())
    }
}

impl FromStr for NodeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, id) = s
            .split_once(':')
            .ok_or_else(|| format!("node id '{s}' is missing a namespace prefix"))?;
        if id.is_empty() {
            return Err(format!("node id '{s}' has an empty identifier"));
        }
        match prefix {
            ENTITY_PREFIX => Ok(Self::Entity(id.to_string())),
            ISSUE_PREFIX => Ok(Self::Issue(id.to_string())),
            other => Err(format!("unknown node namespace '{other}'")),
        }
    }
}

impl TryFrom<String> for NodeId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}
