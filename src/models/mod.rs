// file: src/models/mod.rs
// description: data model exports for pipeline inputs and outcomes

pub mod item;
pub mod result;
pub mod summary;

pub use item::ContentItem;
pub use result::{PipelineResult, ResearchRecord, Stage};
pub use summary::{BatchOutcome, BatchSummary};
