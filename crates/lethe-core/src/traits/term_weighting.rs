/// Statistics for one (term, document) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermStats {
    /// Occurrences of the term in the document.
    pub tf: u32,
    /// Number of documents containing the term.
    pub df: u32,
    /// Token length of the document.
    pub doc_len: u32,
    /// Mean token length across the index.
    pub avg_len: f64,
    /// Number of indexed documents.
    pub n_docs: u32,
}

/// Text-scoring collaborator used by the lexical engine.
///
/// A document's score is the sum of `weight` over the query terms it contains.
pub trait ITermWeighting: Send + Sync {
    fn weight(&self, stats: TermStats) -> f64;

    fn name(&self) -> &str;
}
