//! Batch ingestion of entity / issue / edge records.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use lethe_core::errors::{GraphError, IngestError};
use lethe_core::IngestRecord;
use lethe_observability::ingestion_span;

use crate::store::{EdgeInsert, GraphStore};

/// Summary of one ingestion batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub entities: usize,
    pub issues: usize,
    pub edges_inserted: usize,
    pub edges_unchanged: usize,
    pub edges_skipped: usize,
    /// Issue references dropped because the entity was unknown.
    pub dangling_references: usize,
    /// Edge records rejected with `DuplicateEdgeKind`. Not fatal.
    #[serde(skip)]
    pub conflicts: Vec<GraphError>,
}

impl IngestReport {
    pub fn records(&self) -> usize {
        self.entities
            + self.issues
            + self.edges_inserted
            + self.edges_unchanged
            + self.edges_skipped
            + self.conflicts.len()
    }
}

impl GraphStore {
    /// Apply a batch in phase order: all entities, then issues, then edges.
    /// Within a phase the input order is preserved.
    pub fn ingest(&mut self, records: impl IntoIterator<Item = IngestRecord>) -> IngestReport {
        let mut records: Vec<IngestRecord> = records.into_iter().collect();
        let span = ingestion_span!(records.len());
        let _guard = span.enter();

        records.sort_by_key(IngestRecord::phase);
        let dangling_before = self.stats().dangling_references;
        let mut report = IngestReport::default();

        for record in records {
            match record {
                IngestRecord::Entity(entity) => {
                    self.insert_entity(entity);
                    report.entities += 1;
                }
                IngestRecord::Issue(issue) => {
                    self.insert_issue(issue);
                    report.issues += 1;
                }
                IngestRecord::Edge(edge) => match self.insert_edge_record(&edge) {
                    Ok(EdgeInsert::Inserted) | Ok(EdgeInsert::Replaced) => {
                        report.edges_inserted += 1
                    }
                    Ok(EdgeInsert::Unchanged) => report.edges_unchanged += 1,
                    Ok(EdgeInsert::SkippedDangling) => report.edges_skipped += 1,
                    Err(err) => {
                        warn!(error = %err, "edge record rejected");
                        report.conflicts.push(err);
                    }
                },
            }
        }

        report.dangling_references = self.stats().dangling_references - dangling_before;
        info!(
            entities = report.entities,
            issues = report.issues,
            edges = report.edges_inserted,
            dangling = report.dangling_references,
            conflicts = report.conflicts.len(),
            "ingestion batch applied"
        );
        report
    }

    /// Parse one [`IngestRecord`] per non-empty line, then ingest the batch.
    ///
    /// Any malformed line rejects the whole feed before the store is touched.
    pub fn ingest_jsonl(&mut self, text: &str) -> Result<IngestReport, IngestError> {
        let records = parse_jsonl(text)?;
        Ok(self.ingest(records))
    }
}

/// Decode a JSONL feed. Line numbers in errors are 1-based.
pub fn parse_jsonl(text: &str) -> Result<Vec<IngestRecord>, IngestError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<IngestRecord>(line).map_err(|e| IngestError::Malformed {
                line: i + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}
