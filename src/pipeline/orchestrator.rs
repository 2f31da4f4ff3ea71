// file: src/pipeline/orchestrator.rs
// description: fans items out through resolve -> fetch -> enhance with per-item failure isolation

use crate::config::Config;
use crate::enhance::Enhancer;
use crate::error::{EnhanceError, Result};
use crate::fetch::ContentFetcher;
use crate::models::{BatchOutcome, BatchSummary, ContentItem, PipelineResult, ResearchRecord, Stage};
use crate::pipeline::progress::BatchProgress;
use crate::renderer::RendererPool;
use crate::research::ResearchResolver;
use crate::synthesis::Synthesizer;
use crate::utils::telemetry::OperationTimer;
use crate::utils::validation::Validator;
use chrono::Utc;
use futures::future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Runs the item pipeline once per input, concurrently across the batch.
/// Parallelism is bounded by the renderer pool, not by an orchestrator
/// limit: items past pool capacity suspend inside `acquire`.
pub struct BatchOrchestrator {
    resolver: ResearchResolver,
    fetcher: ContentFetcher,
    enhancer: Enhancer,
    model_tag: String,
    max_batch_size: usize,
}

impl BatchOrchestrator {
    pub fn new(
        pool: Arc<RendererPool>,
        synthesizer: Arc<dyn Synthesizer>,
        config: &Config,
    ) -> Result<Self> {
        Ok(Self {
            resolver: ResearchResolver::new(synthesizer.clone()),
            fetcher: ContentFetcher::new(pool, &config.fetch)?,
            enhancer: Enhancer::new(synthesizer, config.pipeline.excerpt_limit),
            model_tag: config.synthesis.model_tag.clone(),
            max_batch_size: config.pipeline.max_batch_size,
        })
    }

    /// The sole host-facing entry point. Returns one result per input item,
    /// index-aligned, plus the batch summary. Fails as a whole only when
    /// the batch input itself is malformed; once fan-out begins, every
    /// failure is item-scoped by construction.
    pub async fn run_batch(
        &self,
        items: Vec<ContentItem>,
        custom_instruction: Option<&str>,
    ) -> Result<BatchOutcome> {
        Validator::validate_batch(&items, self.max_batch_size)?;

        let batch_id = Uuid::new_v4();
        info!(%batch_id, items = items.len(), "processing batch in parallel");

        let timer = OperationTimer::new("batch enhancement");
        let progress = Arc::new(BatchProgress::new(items.len()));

        let tasks = items.into_iter().enumerate().map(|(index, item)| {
            let progress = progress.clone();
            async move {
                let result = self.process_item(index, item, custom_instruction).await;
                if result.is_success() {
                    progress.item_succeeded();
                } else {
                    progress.item_failed();
                }
                result
            }
        });

        // All item tasks are launched together; the batch resolves only
        // once every item has produced a result.
        let results = future::join_all(tasks).await;
        progress.finish();

        let duration = timer.finish_with_count(results.len());
        let summary = BatchSummary::from_results(batch_id, &results, duration);
        info!(
            %batch_id,
            succeeded = summary.succeeded,
            failed = summary.failed,
            duration_ms = summary.duration_ms,
            "batch complete"
        );

        Ok(BatchOutcome { results, summary })
    }

    async fn process_item(
        &self,
        index: usize,
        item: ContentItem,
        custom_instruction: Option<&str>,
    ) -> PipelineResult {
        let started = Instant::now();
        debug!(index, item_id = %item.id, preview = %item.preview(), "starting item pipeline");

        match self.run_stages(&item, custom_instruction).await {
            Ok((research, enhanced_content)) => {
                debug!(index, item_id = %item.id, "item enhanced");
                PipelineResult::Success {
                    item,
                    research,
                    enhanced_content,
                    model: self.model_tag.clone(),
                    processed_at: Utc::now(),
                    duration_ms: started.elapsed().as_millis() as u64,
                }
            }
            Err((stage, error)) => {
                warn!(index, item_id = %item.id, %stage, error = %error, "item failed");
                PipelineResult::Failure {
                    item,
                    stage,
                    error: error.to_string(),
                    processed_at: Utc::now(),
                    duration_ms: started.elapsed().as_millis() as u64,
                }
            }
        }
    }

    /// Strict stage order within one item; the stage that failed travels
    /// with the error so the result can classify it.
    async fn run_stages(
        &self,
        item: &ContentItem,
        custom_instruction: Option<&str>,
    ) -> std::result::Result<(ResearchRecord, String), (Stage, EnhanceError)> {
        let research = self
            .resolver
            .resolve(&item.content)
            .await
            .map_err(|e| (Stage::Resolve, e))?;

        let page_text = self
            .fetcher
            .fetch(&research.source_url)
            .await
            .map_err(|e| (Stage::Fetch, e))?;

        let enhanced = self
            .enhancer
            .enhance(item, &page_text, &research.source_url, custom_instruction)
            .await
            .map_err(|e| (Stage::Enhance, e))?;

        Ok((
            ResearchRecord {
                generated_query: research.query,
                source_url: research.source_url,
                page_content_length: page_text.len(),
            },
            enhanced,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::renderer::{Renderer, RendererFactory};
    use crate::synthesis::ChatMessage;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Answers the three prompt shapes the pipeline sends. The URL answer
    /// embeds the item's post text so each item researches its own page.
    struct RoutingSynthesizer {
        base_url: String,
    }

    #[async_trait]
    impl Synthesizer for RoutingSynthesizer {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _temperature: Option<f32>,
        ) -> crate::error::Result<String> {
            let system = &messages[0].content;
            let user = &messages[1].content;

            if system.contains("web search query") {
                return Ok(format!("query for {user}"));
            }
            if system.contains("ONE most relevant URL") {
                // user is "query for <post>"; route by post text.
                let page = if user.contains("broken") { "missing" } else { "page" };
                return Ok(format!("{}/{page}", self.base_url));
            }
            Ok(format!("enhanced: {user}"))
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl RendererFactory for FailingFactory {
        async fn launch(&self) -> crate::error::Result<Box<dyn Renderer>> {
            Err(EnhanceError::RendererStart("no engine available".to_string()))
        }
    }

    async fn empty_pool() -> Arc<RendererPool> {
        let config = PoolConfig {
            capacity: 1,
            launch_timeout_ms: 1000,
            acquire_timeout_ms: 1000,
        };
        Arc::new(RendererPool::initialize(&FailingFactory, &config).await)
    }

    async fn orchestrator_against(server: &MockServer) -> BatchOrchestrator {
        let mut config = Config::default_config();
        config.fetch.fallback_timeout_ms = 2000;
        let synthesizer = Arc::new(RoutingSynthesizer {
            base_url: server.uri(),
        });
        BatchOrchestrator::new(empty_pool().await, synthesizer, &config).unwrap()
    }

    async fn mount_page(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><p>research text</p></body></html>"),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_batch_returns_one_result_per_item_in_order() {
        let server = MockServer::start().await;
        mount_page(&server).await;
        let orchestrator = orchestrator_against(&server).await;

        let items = vec![
            ContentItem::new("a", "first post"),
            ContentItem::new("b", "second post"),
            ContentItem::new("c", "third post"),
        ];
        let outcome = orchestrator.run_batch(items, None).await.unwrap();

        assert_eq!(outcome.results.len(), 3);
        let ids: Vec<&str> = outcome.results.iter().map(|r| r.item().id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(outcome.summary.succeeded, 3);
        assert_eq!(outcome.summary.failed, 0);
    }

    #[tokio::test]
    async fn test_one_failing_item_does_not_affect_siblings() {
        let server = MockServer::start().await;
        mount_page(&server).await;
        let orchestrator = orchestrator_against(&server).await;

        let items = vec![
            ContentItem::new("1", "fine post"),
            ContentItem::new("2", "broken post"),
            ContentItem::new("3", "another fine post"),
        ];
        let outcome = orchestrator.run_batch(items, None).await.unwrap();

        assert!(outcome.results[0].is_success());
        assert!(!outcome.results[1].is_success());
        assert!(outcome.results[2].is_success());
        assert_eq!(outcome.summary.succeeded, 2);
        assert_eq!(outcome.summary.failed, 1);

        match &outcome.results[1] {
            PipelineResult::Failure { stage, error, .. } => {
                assert_eq!(*stage, Stage::Fetch);
                // Both the skipped render path and the fallback outcome are
                // recorded in the failure detail.
                assert!(error.contains("rendering not attempted"));
                assert!(error.contains("404"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_result_carries_research_record() {
        let server = MockServer::start().await;
        mount_page(&server).await;
        let orchestrator = orchestrator_against(&server).await;

        let outcome = orchestrator
            .run_batch(vec![ContentItem::new("a", "some post")], Some("be brief"))
            .await
            .unwrap();

        match &outcome.results[0] {
            PipelineResult::Success {
                research,
                enhanced_content,
                model,
                ..
            } => {
                assert_eq!(research.generated_query, "query for some post");
                assert_eq!(research.source_url, format!("{}/page", server.uri()));
                assert_eq!(research.page_content_length, "research text".len());
                assert!(enhanced_content.starts_with("enhanced:"));
                assert_eq!(model, "Llama-4-Maverick");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolver_failure_classified_as_resolve_stage() {
        struct BrokenSynthesizer;

        #[async_trait]
        impl Synthesizer for BrokenSynthesizer {
            async fn complete(
                &self,
                _messages: &[ChatMessage],
                _temperature: Option<f32>,
            ) -> crate::error::Result<String> {
                Err(EnhanceError::Synthesis("quota exceeded".to_string()))
            }
        }

        let config = Config::default_config();
        let orchestrator =
            BatchOrchestrator::new(empty_pool().await, Arc::new(BrokenSynthesizer), &config)
                .unwrap();

        let outcome = orchestrator
            .run_batch(vec![ContentItem::new("a", "post")], None)
            .await
            .unwrap();

        match &outcome.results[0] {
            PipelineResult::Failure { stage, .. } => assert_eq!(*stage, Stage::Resolve),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_batch_rejected_before_fanout() {
        let server = MockServer::start().await;
        let orchestrator = orchestrator_against(&server).await;

        let items = vec![ContentItem::new("a", "")];
        let result = orchestrator.run_batch(items, None).await;
        assert!(matches!(result, Err(EnhanceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_empty_batch_yields_empty_outcome() {
        let server = MockServer::start().await;
        let orchestrator = orchestrator_against(&server).await;

        let outcome = orchestrator.run_batch(Vec::new(), None).await.unwrap();
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.summary.total, 0);
    }
}
