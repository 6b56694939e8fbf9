pub mod recency;
pub mod relevance;
pub mod usage;
