use lethe_core::errors::SimilarityError;
use lethe_core::traits::IQueryEncoder;
use lethe_graph::GraphStore;

use crate::text::issue_representation;

#[derive(Debug, Clone)]
pub(crate) struct IndexedVector {
    pub id: String,
    pub vector: Vec<f32>,
    pub evidence: Vec<String>,
}

/// Precomputed issue representations, all of one dimensionality.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    pub(crate) entries: Vec<IndexedVector>,
    dimensions: usize,
}

impl VectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            entries: Vec::new(),
            dimensions,
        }
    }

    /// Encode every issue in the graph, in id order.
    pub fn build(graph: &GraphStore, encoder: &dyn IQueryEncoder) -> Result<Self, SimilarityError> {
        let mut index = Self::new(encoder.dimensions());
        for issue in graph.issues() {
            let vector = encoder.embed(&issue_representation(graph, &issue))?;
            index.insert(
                issue.id.clone(),
                vector,
                issue.references.iter().cloned().collect(),
            )?;
        }
        Ok(index)
    }

    pub fn insert(
        &mut self,
        id: impl Into<String>,
        vector: Vec<f32>,
        evidence: Vec<String>,
    ) -> Result<(), SimilarityError> {
        if vector.len() != self.dimensions {
            return Err(SimilarityError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        self.entries.push(IndexedVector {
            id: id.into(),
            vector,
            evidence,
        });
        Ok(())
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}
