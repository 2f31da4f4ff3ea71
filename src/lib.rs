// file: src/lib.rs
// description: library entry point and public api exports
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod enhance;
pub mod error;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod renderer;
pub mod research;
pub mod synthesis;
pub mod utils;

pub use config::{Config, FetchConfig, PipelineConfig, PoolConfig, SynthesisConfig};
pub use enhance::Enhancer;
pub use error::{EnhanceError, Result};
pub use fetch::ContentFetcher;
pub use models::{BatchOutcome, BatchSummary, ContentItem, PipelineResult, ResearchRecord, Stage};
pub use pipeline::{BatchOrchestrator, BatchProgress};
pub use renderer::{
    DomRenderer, DomRendererFactory, Renderer, RendererFactory, RendererLease, RendererPool,
};
pub use research::{Research, ResearchResolver};
pub use synthesis::{ChatMessage, Synthesizer, TogetherClient};
pub use utils::{OperationTimer, Validator};
