use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a retrieval engine variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Lexical,
    Similarity,
    Forgetting,
}

impl EngineKind {
    pub const ALL: [EngineKind; 3] = [Self::Lexical, Self::Similarity, Self::Forgetting];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Similarity => "similarity",
            Self::Forgetting => "forgetting",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How ranked lists from several engines are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionPolicy {
    /// Concatenate, stable-sort by own score, truncate.
    Basic,
    /// Scale each score by its engine's adaptive weight first.
    Weighted,
    /// Let the adaptive selector pick Basic or Weighted per query type.
    Adaptive,
}

impl FusionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Weighted => "weighted",
            Self::Adaptive => "adaptive",
        }
    }
}

impl fmt::Display for FusionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
