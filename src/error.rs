// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnhanceError>;

#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid batch input: {0}")]
    InvalidInput(String),

    #[error("Renderer pool has no usable instances")]
    PoolUnavailable,

    #[error("Renderer pool exhausted after waiting {waited_ms}ms")]
    PoolExhausted { waited_ms: u64 },

    #[error("Renderer failed to start: {0}")]
    RendererStart(String),

    #[error("Rendering failed for {url}: {message}")]
    Render { url: String, message: String },

    #[error("All fetch strategies failed for {url}: render: {render_error}; fallback: {fallback_error}")]
    FetchFailed {
        url: String,
        render_error: String,
        fallback_error: String,
    },

    #[error("Synthesis request failed: {0}")]
    Synthesis(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
