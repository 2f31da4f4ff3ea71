// file: src/utils/mod.rs
// description: shared utility module exports

pub mod logging;
pub mod telemetry;
pub mod validation;

pub use telemetry::OperationTimer;
pub use validation::Validator;
