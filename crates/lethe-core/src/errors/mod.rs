pub mod config_error;
pub mod graph_error;
pub mod ingest_error;
pub mod lethe_error;
pub mod similarity_error;

pub use config_error::ConfigError;
pub use graph_error::GraphError;
pub use ingest_error::IngestError;
pub use lethe_error::{LetheError, LetheResult};
pub use similarity_error::SimilarityError;
