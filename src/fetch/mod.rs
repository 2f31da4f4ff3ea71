// file: src/fetch/mod.rs
// description: content fetcher with rendered-page path and raw-document fallback

use crate::config::FetchConfig;
use crate::error::{EnhanceError, Result};
use crate::renderer::RendererPool;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

lazy_static! {
    static ref SCRIPT_RE: Regex =
        Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid script regex");
    static ref STYLE_RE: Regex =
        Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid style regex");
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]+>").expect("valid tag regex");
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
}

/// Fetches a URL's textual content, preferring a pooled renderer and
/// degrading to a direct unrendered retrieval when rendering is
/// unavailable or fails. The renderer lease is held only for the duration
/// of the render call and is released on every path by its drop guard.
pub struct ContentFetcher {
    pool: Arc<RendererPool>,
    client: Client,
    page_load_timeout: Duration,
    fallback_timeout: Duration,
}

impl ContentFetcher {
    pub fn new(pool: Arc<RendererPool>, config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_millis(config.fallback_timeout_ms))
            .build()?;

        Ok(Self {
            pool,
            client,
            page_load_timeout: Duration::from_millis(config.page_load_timeout_ms),
            fallback_timeout: Duration::from_millis(config.fallback_timeout_ms),
        })
    }

    pub async fn fetch(&self, url: &str) -> Result<String> {
        // Degraded pool is a routing signal, not an error: skip acquisition
        // entirely and go straight to the fallback.
        let render_error = if self.pool.is_empty() {
            debug!(%url, "renderer pool empty, using direct retrieval");
            "rendering not attempted (pool empty)".to_string()
        } else {
            match self.render(url).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!(%url, error = %e, "render path failed, falling back");
                    e.to_string()
                }
            }
        };

        match self.fetch_raw(url).await {
            Ok(text) => Ok(text),
            Err(fallback) => Err(EnhanceError::FetchFailed {
                url: url.to_string(),
                render_error,
                fallback_error: fallback.to_string(),
            }),
        }
    }

    async fn render(&self, url: &str) -> Result<String> {
        let lease = self.pool.acquire().await?;
        let text = lease
            .renderer()
            .render_page(url, self.page_load_timeout)
            .await?;
        debug!(%url, chars = text.len(), "rendered page content");
        Ok(text)
    }

    async fn fetch_raw(&self, url: &str) -> Result<String> {
        debug!(%url, "direct document retrieval");

        let response = self
            .client
            .get(url)
            .timeout(self.fallback_timeout)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Ok(strip_markup(&body))
    }
}

/// Reduce raw HTML to readable text: drop script/style blocks, strip tags,
/// decode common entities, collapse whitespace.
pub fn strip_markup(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, " ");
    let without_styles = STYLE_RE.replace_all(&without_scripts, " ");
    let without_tags = TAG_RE.replace_all(&without_styles, " ");

    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}
