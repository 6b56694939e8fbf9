// Single source of truth for all default values.

// --- Forgetting ---
pub const DEFAULT_USAGE_WEIGHT: f64 = 0.3;
pub const DEFAULT_RECENCY_WEIGHT: f64 = 0.4;
pub const DEFAULT_RELEVANCE_WEIGHT: f64 = 0.3;
pub const DEFAULT_DECAY_RATE: f64 = 0.1; // λ, per year
pub const DEFAULT_RETENTION_THRESHOLD: f64 = 0.3;
pub const DEFAULT_QUERY_TYPE_WEIGHTS: bool = false;

// --- Adaptive threshold ---
pub const DEFAULT_THRESHOLD_WINDOW: usize = 100;
pub const DEFAULT_THRESHOLD_MIN_SAMPLES: usize = 10;
pub const DEFAULT_THRESHOLD_STEP: f64 = 0.05;
pub const DEFAULT_THRESHOLD_FLOOR: f64 = 0.1;
pub const DEFAULT_THRESHOLD_CEILING: f64 = 0.9;
pub const DEFAULT_THRESHOLD_LOW_WATER: f64 = 0.5;
pub const DEFAULT_THRESHOLD_HIGH_WATER: f64 = 0.8;

// --- Selector ---
pub const DEFAULT_EPSILON: f64 = 0.1;
pub const DEFAULT_MIN_SAMPLES: usize = 5;
pub const DEFAULT_WINDOW_CAPACITY: usize = 100;
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

// --- Retrieval ---
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_MIN_FINAL_SCORE: f64 = 0.1;
pub const DEFAULT_ADAPT_EVERY: u64 = 10;
pub const DEFAULT_BM25_K1: f64 = 1.2;
pub const DEFAULT_BM25_B: f64 = 0.75;
/// BM25 score that maps to outcome confidence 0.5.
pub const DEFAULT_BM25_CONFIDENCE_MIDPOINT: f64 = 4.0;

// --- Graph ---
pub const DEFAULT_REFERENCE_WEIGHT: f64 = 1.0;
pub const DEFAULT_STRUCTURAL_WEIGHT: f64 = 1.0;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 1_000;
