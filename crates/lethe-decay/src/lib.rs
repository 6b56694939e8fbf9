//! # lethe-decay
//!
//! Query-time forgetting score for issues:
//!
//! ```text
//! score = w_u * usage + w_r * recency + w_v * relevance
//! ```
//!
//! with `usage = min(access_count / 10, 1)`,
//! `recency = exp(-λ * days_since_last_access / 365)` and `relevance` from an
//! injected similarity function. Also provides retention decisions over a
//! batch and an adaptive retention threshold.

pub mod factors;
pub mod formula;
pub mod retention;
pub mod scorer;
pub mod threshold;
pub mod weights;

pub use formula::ForgettingBreakdown;
pub use retention::{RetentionDecision, RetentionReport};
pub use scorer::{ForgettingScore, ForgettingScorer};
pub use threshold::AdaptiveThreshold;
pub use weights::ForgettingWeights;
