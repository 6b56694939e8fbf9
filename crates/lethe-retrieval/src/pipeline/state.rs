use serde::{Deserialize, Serialize};

use lethe_adaptive::SelectorState;
use lethe_core::{EngineKind, FusionPolicy, LetheResult};
use lethe_decay::AdaptiveThreshold;

/// Everything a pipeline learns while serving queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub engine_selector: SelectorState<EngineKind>,
    pub fusion_selector: SelectorState<FusionPolicy>,
    /// Absent when no forgetting-weighted engine is attached.
    #[serde(default)]
    pub forgetting_threshold: Option<AdaptiveThreshold>,
}

impl PipelineState {
    pub fn to_json(&self) -> LetheResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> LetheResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
