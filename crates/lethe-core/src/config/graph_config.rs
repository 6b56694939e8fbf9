use serde::{Deserialize, Serialize};

use super::defaults;

/// Weights given to edges the store materialises itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Weight of issue → entity edges derived from an issue's reference set.
    pub reference_weight: f64,
    /// Weight of entity → entity edges derived from structural relations.
    pub structural_weight: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            reference_weight: defaults::DEFAULT_REFERENCE_WEIGHT,
            structural_weight: defaults::DEFAULT_STRUCTURAL_WEIGHT,
        }
    }
}
