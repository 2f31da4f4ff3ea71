// file: src/enhance/mod.rs
// description: synthesizes the enriched post from the item and fetched research text

use crate::error::Result;
use crate::models::ContentItem;
use crate::synthesis::{ChatMessage, Synthesizer};
use std::sync::Arc;
use tracing::debug;

const BASE_PROMPT: &str = "Enhance this post with context from research. Include:
    1. Key factual insight (with source if possible)
    2. Current social sentiment about this topic
    3. Maintain the original author's tone
    4. Add relevant hashtags if applicable";

/// Builds the enhancement request and delegates it to the synthesis
/// collaborator. Fetched text is excerpted at a fixed ceiling so request
/// size and external cost stay bounded regardless of source length.
pub struct Enhancer {
    synthesizer: Arc<dyn Synthesizer>,
    excerpt_limit: usize,
}

impl Enhancer {
    pub fn new(synthesizer: Arc<dyn Synthesizer>, excerpt_limit: usize) -> Self {
        Self {
            synthesizer,
            excerpt_limit,
        }
    }

    pub async fn enhance(
        &self,
        item: &ContentItem,
        page_text: &str,
        source_url: &str,
        custom_instruction: Option<&str>,
    ) -> Result<String> {
        let instruction = match custom_instruction {
            Some(custom) => format!("{BASE_PROMPT}\n\nAdditional Instructions: {custom}"),
            None => BASE_PROMPT.to_string(),
        };

        let excerpt = excerpt(page_text, self.excerpt_limit);
        debug!(
            item_id = %item.id,
            excerpt_chars = excerpt.chars().count(),
            "generating enhanced content"
        );

        let messages = [
            ChatMessage::system(format!("{instruction}\n\nOriginal Post: {}", item.content)),
            ChatMessage::user(format!("Research Context from {source_url}:\n{excerpt}")),
        ];

        self.synthesizer.complete(&messages, None).await
    }
}

/// Char-boundary-safe prefix of at most `limit` characters.
fn excerpt(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
