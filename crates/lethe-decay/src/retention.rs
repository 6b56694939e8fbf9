use serde::Serialize;

use lethe_core::Issue;

/// Whether an issue falls below the retention threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionDecision {
    pub issue_id: String,
    pub forget: bool,
    pub score: f64,
    pub threshold: f64,
    pub reason: String,
}

/// Forget when `score < threshold`.
pub fn should_forget(score: f64, threshold: f64) -> bool {
    score < threshold
}

/// Evaluate retention for one issue.
pub fn evaluate(issue: &Issue, score: f64, threshold: f64) -> RetentionDecision {
    let forget = should_forget(score, threshold);
    let reason = if forget {
        format!("score {score:.3} below threshold {threshold:.3}")
    } else {
        "score at or above threshold".to_string()
    };
    RetentionDecision {
        issue_id: issue.id.clone(),
        forget,
        score,
        threshold,
        reason,
    }
}

/// Batch retention statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionReport {
    pub total: usize,
    pub forgotten: usize,
    /// `(total - forgotten) / total`, 0 for an empty batch.
    pub retention_rate: f64,
    pub average_score: f64,
    pub threshold: f64,
    pub decisions: Vec<RetentionDecision>,
}

impl RetentionReport {
    pub fn from_decisions(decisions: Vec<RetentionDecision>, threshold: f64) -> Self {
        let total = decisions.len();
        let forgotten = decisions.iter().filter(|d| d.forget).count();
        let (retention_rate, average_score) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                (total - forgotten) as f64 / total as f64,
                decisions.iter().map(|d| d.score).sum::<f64>() / total as f64,
            )
        };
        Self {
            total,
            forgotten,
            retention_rate,
            average_score,
            threshold,
            decisions,
        }
    }

    /// Ids of the issues reported as forgotten.
    pub fn forgotten_ids(&self) -> impl Iterator<Item = &str> {
        self.decisions
            .iter()
            .filter(|d| d.forget)
            .map(|d| d.issue_id.as_str())
    }
}
