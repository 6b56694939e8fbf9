//! Span macros shared across the workspace. Callers need `tracing` as a
//! direct dependency because the macros expand to `tracing::*_span!`.

/// Root span of one query: `retrieval_span!(text, query_type)`.
#[macro_export]
macro_rules! retrieval_span {
    ($query:expr, $query_type:expr) => {
        tracing::info_span!(
            "lethe.retrieval",
            query = %$query,
            query_type = %$query_type
        )
    };
}

/// One ingestion batch: `ingestion_span!(record_count)`.
#[macro_export]
macro_rules! ingestion_span {
    ($records:expr) => {
        tracing::info_span!("lethe.ingestion", records = $records)
    };
}

/// An arm choice by an adaptive selector: `selection_span!(choice, query_type)`.
#[macro_export]
macro_rules! selection_span {
    ($decision:expr, $query_type:expr) => {
        tracing::debug_span!(
            "lethe.selection",
            decision = %$decision,
            query_type = %$query_type
        )
    };
}

/// Merging `lists` ranked lists under `policy`.
#[macro_export]
macro_rules! fusion_span {
    ($policy:expr, $lists:expr) => {
        tracing::debug_span!(
            "lethe.fusion",
            policy = %$policy,
            lists = $lists
        )
    };
}

/// Span names, for subscribers filtering on them.
pub mod names {
    pub const RETRIEVAL: &str = "lethe.retrieval";
    pub const INGESTION: &str = "lethe.ingestion";
    pub const SELECTION: &str = "lethe.selection";
    pub const FUSION: &str = "lethe.fusion";
}
