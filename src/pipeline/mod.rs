// file: src/pipeline/mod.rs
// description: batch orchestration module exports

pub mod orchestrator;
pub mod progress;

pub use orchestrator::BatchOrchestrator;
pub use progress::BatchProgress;
