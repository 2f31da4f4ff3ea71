// file: src/renderer/dom.rs
// description: HTTP-backed renderer extracting article text from the parsed DOM

use crate::config::FetchConfig;
use crate::error::{EnhanceError, Result};
use crate::renderer::{Renderer, RendererFactory};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

/// Default renderer implementation. Retrieves the document over HTTP and
/// extracts visible text from the parsed DOM, preferring `article`, then
/// `main`, then the whole `body` — the same preference order a headless
/// engine would apply. Engines that execute scripts plug in behind the
/// [`Renderer`] trait instead.
pub struct DomRenderer {
    client: Client,
}

#[async_trait]
impl Renderer for DomRenderer {
    async fn render_page(&self, url: &str, timeout: Duration) -> Result<String> {
        debug!(%url, "rendering page");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| EnhanceError::Render {
                url: url.to_string(),
                message: format!("navigation failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnhanceError::Render {
                url: url.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        let body = response.text().await.map_err(|e| EnhanceError::Render {
            url: url.to_string(),
            message: format!("body read failed: {e}"),
        })?;

        let text = extract_visible_text(&body);
        if text.is_empty() {
            return Err(EnhanceError::Render {
                url: url.to_string(),
                message: "no visible text extracted".to_string(),
            });
        }

        debug!(%url, chars = text.len(), "page rendered");
        Ok(text)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Pull readable text out of an HTML document.
fn extract_visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    for selector in ["article", "main", "body"] {
        let sel = Selector::parse(selector).expect("static selector");
        if let Some(element) = doc.select(&sel).next() {
            let text = element
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !text.is_empty() {
                return text;
            }
        }
    }

    String::new()
}

/// Launches [`DomRenderer`] instances for the pool.
pub struct DomRendererFactory {
    user_agent: String,
}

impl DomRendererFactory {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl RendererFactory for DomRendererFactory {
    async fn launch(&self) -> Result<Box<dyn Renderer>> {
        let client = Client::builder()
            .user_agent(self.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| EnhanceError::RendererStart(e.to_string()))?;

        Ok(Box::new(DomRenderer { client }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_prefers_article_region() {
        let html = r#"<html><body>
            <nav>Site navigation</nav>
            <article><h1>Title</h1><p>Article body text.</p></article>
        </body></html>"#;

        let text = extract_visible_text(html);
        assert_eq!(text, "Title Article body text.");
    }

    #[test]
    fn test_extract_falls_back_to_body() {
        let html = "<html><body><p>Plain body content</p></body></html>";
        assert_eq!(extract_visible_text(html), "Plain body content");
    }

    #[test]
    fn test_extract_empty_document() {
        assert_eq!(extract_visible_text("<html><body></body></html>"), "");
    }

    #[tokio::test]
    async fn test_render_page_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/story"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><article><p>Breaking news here.</p></article></body></html>",
            ))
            .mount(&server)
            .await;

        let factory = DomRendererFactory::new(&Config::default_config().fetch);
        let renderer = factory.launch().await.unwrap();
        let text = renderer
            .render_page(&format!("{}/story", server.uri()), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(text, "Breaking news here.");
    }

    #[tokio::test]
    async fn test_render_page_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let factory = DomRendererFactory::new(&Config::default_config().fetch);
        let renderer = factory.launch().await.unwrap();
        let result = renderer
            .render_page(&format!("{}/gone", server.uri()), Duration::from_secs(5))
            .await;
        assert!(matches!(result, Err(EnhanceError::Render { .. })));
    }
}
