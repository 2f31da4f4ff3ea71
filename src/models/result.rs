// file: src/models/result.rs
// description: per-item pipeline outcome as a tagged success/failure union

use crate::models::ContentItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage at which an item failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Resolve,
    Fetch,
    Enhance,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolve => write!(f, "resolve"),
            Stage::Fetch => write!(f, "fetch"),
            Stage::Enhance => write!(f, "enhance"),
        }
    }
}

/// Research metadata attached to a successful enhancement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchRecord {
    pub generated_query: String,
    pub source_url: String,
    pub page_content_length: usize,
}

/// Outcome for one item. Exactly one variant per item, produced once and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PipelineResult {
    Success {
        item: ContentItem,
        research: ResearchRecord,
        enhanced_content: String,
        model: String,
        processed_at: DateTime<Utc>,
        duration_ms: u64,
    },
    Failure {
        item: ContentItem,
        stage: Stage,
        error: String,
        processed_at: DateTime<Utc>,
        duration_ms: u64,
    },
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success { .. })
    }

    /// The originating item, for caller-side correlation.
    pub fn item(&self) -> &ContentItem {
        match self {
            PipelineResult::Success { item, .. } => item,
            PipelineResult::Failure { item, .. } => item,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            PipelineResult::Success { duration_ms, .. } => *duration_ms,
            PipelineResult::Failure { duration_ms, .. } => *duration_ms,
        }
    }
}
