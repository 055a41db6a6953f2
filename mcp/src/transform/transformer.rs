//! Result normalizer for the built-in web tools.

use serde_json::Value;

use super::{FetchedPage, SearchHit};

/// Maps raw registry results onto [`SearchHit`] lists and [`FetchedPage`]s.
pub struct ResultNormalizer;

impl ResultNormalizer {
    /// Extract up to `max_results` search hits. Entries without a URL are dropped.
    pub fn search_hits(result: &Value, max_results: usize) -> Vec<SearchHit> {
        let unwrapped = Self::unwrap_content_blocks(result);
        let result = unwrapped.as_ref().unwrap_or(result);

        let maybe_array = result.as_array().or_else(|| {
            result.as_object().and_then(|obj| {
                ["results", "hits", "items"]
                    .iter()
                    .find_map(|key| obj.get(*key).and_then(Value::as_array))
            })
        });

        maybe_array
            .map(|arr| {
                arr.iter()
                    .filter_map(Self::parse_search_hit)
                    .take(max_results)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parse a single search hit from JSON.
    fn parse_search_hit(item: &Value) -> Option<SearchHit> {
        let obj = item.as_object()?;
        let url = obj.get("url").and_then(Value::as_str)?;
        Some(SearchHit {
            title: Self::first_str(item, &["title", "name"]).unwrap_or_default(),
            url: url.to_string(),
            snippet: Self::first_str(item, &["snippet", "description", "content", "text"])
                .unwrap_or_default(),
            published_date: Self::first_str(
                item,
                &["publishedDate", "published_date", "page_age", "date"],
            ),
        })
    }

    /// Extract page content for a fetch of `requested_url`.
    pub fn fetched_page(result: &Value, requested_url: &str) -> FetchedPage {
        if let Some(text) = result.as_str() {
            return FetchedPage {
                title: None,
                content: text.to_string(),
                url: requested_url.to_string(),
            };
        }

        if let Some(unwrapped) = Self::unwrap_content_blocks(result) {
            return Self::fetched_page(&unwrapped, requested_url);
        }

        if let Some(blocks) = result.as_array() {
            return FetchedPage {
                title: None,
                content: Self::join_text_blocks(blocks),
                url: requested_url.to_string(),
            };
        }

        let content = match result.get("content") {
            Some(Value::Array(blocks)) => Self::join_text_blocks(blocks),
            _ => Self::first_str(result, &["content", "text", "markdown", "body"])
                .unwrap_or_default(),
        };

        FetchedPage {
            title: Self::first_str(result, &["title"]),
            content,
            url: Self::first_str(result, &["url"]).unwrap_or_else(|| requested_url.to_string()),
        }
    }

    /// A single text content block whose text is JSON is unwrapped to that JSON.
    fn unwrap_content_blocks(result: &Value) -> Option<Value> {
        let blocks = result.as_array()?;
        let [block] = blocks.as_slice() else {
            return None;
        };
        if block.get("type").and_then(Value::as_str) != Some("text") {
            return None;
        }
        let text = block.get("text").and_then(Value::as_str)?;
        match serde_json::from_str::<Value>(text) {
            Ok(parsed) if parsed.is_object() || parsed.is_array() => Some(parsed),
            _ => None,
        }
    }

    fn join_text_blocks(blocks: &[Value]) -> String {
        blocks
            .iter()
            .filter_map(|block| match block {
                Value::String(s) => Some(s.as_str()),
                _ => block.get("text").and_then(Value::as_str),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
        let obj = value.as_object()?;
        keys.iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .map(String::from)
    }
}
