use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of one (arm, query type) key, derived from its sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmState {
    Unobserved,
    /// `0 < n < min_samples`
    Exploring,
    /// `n >= min_samples`
    Exploiting,
}

impl ArmState {
    pub fn from_count(count: usize, min_samples: usize) -> Self {
        if count == 0 {
            Self::Unobserved
        } else if count < min_samples {
            Self::Exploring
        } else {
            Self::Exploiting
        }
    }
}

impl fmt::Display for ArmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unobserved => "unobserved",
            Self::Exploring => "exploring",
            Self::Exploiting => "exploiting",
        })
    }
}
