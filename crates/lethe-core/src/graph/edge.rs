use std::fmt;

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Kind of a directed relation between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    // Structural (entity ↔ entity)
    Contains,
    ContainedIn,
    Adjacent,
    // Collaboration (issue → entity)
    References,
    // Free-form link of either shape.
    Related,
}

impl RelationKind {
    pub const ALL: [RelationKind; 5] = [
        Self::Contains,
        Self::ContainedIn,
        Self::Adjacent,
        Self::References,
        Self::Related,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::ContainedIn => "contained_in",
            Self::Adjacent => "adjacent",
            Self::References => "references",
            Self::Related => "related",
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Contains | Self::ContainedIn | Self::Adjacent)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static edge confidence clamped to [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    pub const FULL: Weight = Weight(1.0);

    /// Create a new Weight, clamping to [0.0, 1.0]. NaN becomes 0.0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Weight {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Weight> for f64 {
    fn from(w: Weight) -> Self {
        w.0
    }
}

/// A directed, weighted relation between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: RelationKind,
    #[serde(default)]
    pub weight: Weight,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, kind: RelationKind, weight: impl Into<Weight>) -> Self {
        Self {
            from,
            to,
            kind,
            weight: weight.into(),
        }
    }
}
