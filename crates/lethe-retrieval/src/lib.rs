//! # lethe-retrieval
//!
//! The query engine. A query is classified, routed to one engine (or all of
//! them in hybrid mode), fused, and fed back into the adaptive selectors.
//!
//! ## Architecture
//!
//! ```text
//! RetrievalPipeline
//! ├── QueryClassifier
//! │   └── Rule table (identifier → temporal → author → relationship → complex → keyword)
//! ├── AdaptiveSelector<EngineKind> (epsilon-greedy engine choice)
//! ├── Engines (IRetrievalEngine)
//! │   ├── LexicalEngine (inverted index + BM25)
//! │   ├── SimilarityEngine (VectorIndex + injected similarity)
//! │   └── ForgettingEngine (similarity ranking re-scored by ForgettingScorer)
//! ├── FusionEngine
//! │   ├── Basic (concatenate, dedupe, stable sort)
//! │   ├── Weighted (scale by adaptive engine weight)
//! │   └── Adaptive (AdaptiveSelector<FusionPolicy> picks basic or weighted)
//! └── Feedback
//!     ├── record_outcome per invoked engine / fusion policy
//!     ├── record_access on every surfaced issue
//!     └── QueryLog entry
//! ```

pub mod forgetting;
pub mod fusion;
pub mod intent;
pub mod lexical;
pub mod pipeline;
pub mod similarity;
pub mod text;

pub use forgetting::ForgettingEngine;
pub use fusion::{FusedCandidate, FusionEngine, FusionOutcome};
pub use intent::QueryClassifier;
pub use lexical::{Bm25, LexicalEngine, LexicalIndex};
pub use pipeline::{PipelineState, QueryRequest, QueryResponse, RetrievalPipeline};
pub use similarity::{SimilarityEngine, VectorIndex};
