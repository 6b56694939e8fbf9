//! Inverted index over issue documents.

use std::collections::HashMap;

use lethe_core::Issue;
use lethe_graph::GraphStore;

use crate::text::{lexical_document, tokenize};

/// An indexed issue.
#[derive(Debug, Clone)]
pub(crate) struct IndexedDoc {
    pub id: String,
    pub evidence: Vec<String>,
    pub len: u32,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Posting {
    pub doc: usize,
    pub tf: u32,
}

/// Term → postings, plus per-document lengths. Built once after ingestion.
#[derive(Debug, Clone, Default)]
pub struct LexicalIndex {
    pub(crate) docs: Vec<IndexedDoc>,
    pub(crate) postings: HashMap<String, Vec<Posting>>,
    total_len: u64,
}

impl LexicalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every issue in the graph, in id order.
    pub fn build(graph: &GraphStore) -> Self {
        let mut index = Self::new();
        for issue in graph.issues() {
            let document = lexical_document(graph, &issue);
            index.add_document(&issue, &document);
        }
        index
    }

    /// Add one issue with the text it should be found by.
    pub fn add_document(&mut self, issue: &Issue, document: &str) {
        let tokens = tokenize(document);
        let doc = self.docs.len();

        let mut counts: HashMap<String, u32> = HashMap::new();
        for token in &tokens {
            *counts.entry(token.clone()).or_default() += 1;
        }
        for (term, tf) in counts {
            self.postings.entry(term).or_default().push(Posting { doc, tf });
        }

        let len = u32::try_from(tokens.len()).unwrap_or(u32::MAX);
        self.total_len += len as u64;
        self.docs.push(IndexedDoc {
            id: issue.id.clone(),
            evidence: issue.references.iter().cloned().collect(),
            len,
        });
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// Number of documents containing `term` (already lowercased).
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    pub fn avg_len(&self) -> f64 {
        if self.docs.is_empty() {
            0.0
        } else {
            self.total_len as f64 / self.docs.len() as f64
        }
    }
}
