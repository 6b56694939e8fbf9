pub mod candidate;
pub mod engine_kind;
pub mod query_type;

pub use candidate::{Candidate, EngineOutput, EngineQuery, RankedResult};
pub use engine_kind::{EngineKind, FusionPolicy};
pub use query_type::QueryType;
