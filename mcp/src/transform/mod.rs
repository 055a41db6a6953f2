//! Normalization of raw registry results into fixed tool output shapes.
//!
//! Registry sources answer search and fetch calls in several shapes (bare arrays,
//! `{"results": [...]}` objects, MCP content blocks carrying JSON text). The
//! fallback tools promise the model a stable shape, so results pass through
//! [`ResultNormalizer`] first.
//!
//! # Example
//!
//! ```ignore
//! use smg_tools::transform::ResultNormalizer;
//!
//! let raw = serde_json::json!({"results": [{"url": "https://example.com", "title": "Example"}]});
//! let hits = ResultNormalizer::search_hits(&raw, 10);
//! ```

mod transformer;
mod types;

pub use transformer::ResultNormalizer;
pub use types::{FetchedPage, SearchHit, WebFetchOutput, WebSearchOutput};
