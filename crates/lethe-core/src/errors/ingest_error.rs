/// Errors raised while decoding an ingestion feed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    #[error("malformed record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
