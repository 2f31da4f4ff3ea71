// file: src/utils/validation.rs
// description: batch input validation helpers

use crate::error::{EnhanceError, Result};
use crate::models::ContentItem;

pub struct Validator;

impl Validator {
    /// Pre-fan-out validation: the only check that can fail a whole batch.
    /// An empty batch is valid and yields an empty outcome.
    pub fn validate_batch(items: &[ContentItem], max_batch_size: usize) -> Result<()> {
        if items.len() > max_batch_size {
            return Err(EnhanceError::InvalidInput(format!(
                "batch of {} items exceeds maximum of {}",
                items.len(),
                max_batch_size
            )));
        }

        for (index, item) in items.iter().enumerate() {
            Self::validate_item(item)
                .map_err(|e| EnhanceError::InvalidInput(format!("item {index}: {e}")))?;
        }

        Ok(())
    }

    pub fn validate_item(item: &ContentItem) -> Result<()> {
        if item.id.trim().is_empty() {
            return Err(EnhanceError::InvalidInput("id is empty".to_string()));
        }

        if item.content.trim().is_empty() {
            return Err(EnhanceError::InvalidInput("content is empty".to_string()));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(EnhanceError::InvalidInput(format!(
                "Invalid URL format: {url}"
            )));
        }
        Ok(())
    }
}
