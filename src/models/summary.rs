// file: src/models/summary.rs
// description: aggregate statistics computed once all item results are in

use crate::models::PipelineResult;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub avg_item_ms: f64,
    pub max_item_ms: u64,
}

impl BatchSummary {
    pub fn from_results(batch_id: Uuid, results: &[PipelineResult], duration: Duration) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let failed = results.len() - succeeded;

        let avg_item_ms = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.duration_ms() as f64).sum::<f64>() / results.len() as f64
        };

        let max_item_ms = results.iter().map(|r| r.duration_ms()).max().unwrap_or(0);

        Self {
            batch_id,
            total: results.len(),
            succeeded,
            failed,
            duration_ms: duration.as_millis() as u64,
            avg_item_ms,
            max_item_ms,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total as f64) * 100.0
    }
}

/// Everything `run_batch` hands back to the host: one result per input item
/// (index-aligned) plus the aggregate summary.
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<PipelineResult>,
    pub summary: BatchSummary,
}
