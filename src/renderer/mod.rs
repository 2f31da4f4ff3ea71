// file: src/renderer/mod.rs
// description: page renderer abstraction and fixed-capacity pool

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub mod dom;
pub mod pool;

pub use dom::{DomRenderer, DomRendererFactory};
pub use pool::{RendererLease, RendererPool};

/// One page-rendering engine instance, held for exclusive use through a
/// [`RendererLease`]. Each `render_page` call must use an isolated context
/// so state never leaks between pooled callers.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Navigate to `url` within `timeout` and return the page's visible
    /// text, preferring a primary-article region over the whole document.
    async fn render_page(&self, url: &str, timeout: Duration) -> Result<String>;

    /// Tear the instance down. Called once, during pool shutdown.
    async fn close(&self) -> Result<()>;
}

/// Launches renderer instances for the pool.
#[async_trait]
pub trait RendererFactory: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Renderer>>;
}
