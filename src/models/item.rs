// file: src/models/item.rs
// description: input unit supplied by the caller, consumed read-only

use serde::{Deserialize, Serialize};

/// A short social post to be enriched. Immutable once deserialized; the
/// pipeline never mutates it, only carries it through to the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub content: String,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    /// Short preview of the content for log lines.
    pub fn preview(&self) -> String {
        self.content.chars().take(50).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preview_truncates_long_content() {
        let item = ContentItem::new("t1", "x".repeat(200));
        assert_eq!(item.preview().len(), 50);
    }

    #[test]
    fn test_preview_keeps_short_content() {
        let item = ContentItem::new("t1", "short post");
        assert_eq!(item.preview(), "short post");
    }

    #[test]
    fn test_deserialize_from_json() {
        let item: ContentItem =
            serde_json::from_str(r#"{"id":"42","content":"hello"}"#).unwrap();
        assert_eq!(item.id, "42");
        assert_eq!(item.content, "hello");
    }
}
