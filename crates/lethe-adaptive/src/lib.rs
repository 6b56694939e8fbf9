//! # lethe-adaptive
//!
//! Online arm selection. One [`AdaptiveSelector`] keeps a bounded
//! [`PerformanceRecord`] per (arm, query type) key and picks arms epsilon-greedily.
//! The pipeline runs two independent instances: one over engines, one over
//! fusion policies.

pub mod events;
pub mod record;
pub mod selector;
pub mod state;

pub use events::OutcomeEvent;
pub use record::{OutcomeSample, PerformanceRecord};
pub use selector::{
    AdaptiveSelector, Arm, EngineChoice, KeyStats, RecordState, SelectionMode, SelectorSnapshot,
    SelectorState,
};
pub use state::ArmState;
