pub mod encoder;
pub mod retrieval_engine;
pub mod similarity;
pub mod term_weighting;

pub use encoder::IQueryEncoder;
pub use retrieval_engine::IRetrievalEngine;
pub use similarity::{CosineSimilarity, ISimilarity};
pub use term_weighting::{ITermWeighting, TermStats};
