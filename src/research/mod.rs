// file: src/research/mod.rs
// description: derives a search query and candidate research URL for an item

use crate::error::{EnhanceError, Result};
use crate::synthesis::{ChatMessage, Synthesizer};
use std::sync::Arc;
use tracing::debug;

const QUERY_PROMPT: &str =
    "Create a detailed web search query from this post. Respond ONLY with the query:";
const URL_PROMPT: &str =
    "Suggest ONE most relevant URL to research this. Respond ONLY with a valid URL:";

/// The URL suggestion runs at low temperature so the model stays literal.
const URL_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Research {
    pub query: String,
    pub source_url: String,
}

/// Resolves a research source for an item via two sequential synthesis
/// calls: post text -> search query -> candidate URL. Collaborator failures
/// propagate upward and are fatal to the item only.
pub struct ResearchResolver {
    synthesizer: Arc<dyn Synthesizer>,
}

impl ResearchResolver {
    pub fn new(synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self { synthesizer }
    }

    pub async fn resolve(&self, content: &str) -> Result<Research> {
        let query = self
            .synthesizer
            .complete(
                &[ChatMessage::system(QUERY_PROMPT), ChatMessage::user(content)],
                None,
            )
            .await?;
        let query = query.trim().to_string();
        debug!(%query, "generated search query");

        let raw_url = self
            .synthesizer
            .complete(
                &[ChatMessage::system(URL_PROMPT), ChatMessage::user(&query)],
                Some(URL_TEMPERATURE),
            )
            .await?;

        let source_url = normalize_url(&raw_url)?;
        debug!(%source_url, "resolved research url");

        Ok(Research { query, source_url })
    }
}

/// Clean a model-suggested URL: keep only the first whitespace-separated
/// token, prefix a scheme when absent, and verify the result parses.
pub fn normalize_url(raw: &str) -> Result<String> {
    let first = raw.split_whitespace().next().unwrap_or("");
    if first.is_empty() {
        return Err(EnhanceError::Synthesis(
            "collaborator returned an empty URL".to_string(),
        ));
    }

    let candidate = if first.starts_with("http") {
        first.to_string()
    } else {
        format!("https://{first}")
    };

    url::Url::parse(&candidate).map_err(|e| {
        EnhanceError::Synthesis(format!("collaborator returned an invalid URL ({candidate}): {e}"))
    })?;

    Ok(candidate)
}
