/// Lethe system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Access count at which the usage factor saturates at 1.0.
pub const USAGE_SATURATION_COUNT: f64 = 10.0;

/// Days per year used by the recency factor.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Tolerance when checking that forgetting weights sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Blend applied by the forgetting-weighted engine:
/// `final = RAW * raw_score_normalized + FORGETTING * forgetting_score`.
pub const FORGETTING_BLEND_RAW: f64 = 0.6;
pub const FORGETTING_BLEND_SCORE: f64 = 0.4;

/// Bounds for the per-engine adaptive fusion weight.
pub const ADAPTIVE_WEIGHT_MIN: f64 = 0.1;
pub const ADAPTIVE_WEIGHT_MAX: f64 = 2.0;

/// Number of results at which the result-count term of an outcome saturates.
pub const OUTCOME_RESULT_SATURATION: f64 = 10.0;

/// Namespace prefixes for node identifiers.
pub const ENTITY_PREFIX: &str = "entity";
pub const ISSUE_PREFIX: &str = "issue";
