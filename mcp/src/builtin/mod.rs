//! Built-in fallback tools.
//!
//! Installed in place of the primary source's tools when its discovery yields
//! nothing. Both tools are thin adapters over [`RegistryClient::invoke_tool`]
//! against the primary source, with fixed schemas and failure outputs that
//! never propagate as errors.

mod web_fetch;
mod web_search;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

pub use web_fetch::WebFetchTool;
pub use web_search::WebSearchTool;

use crate::{core::client::RegistryClient, inventory::CatalogTool};

pub const WEB_SEARCH: &str = "web_search";
pub const WEB_FETCH: &str = "web_fetch";

/// The full fallback set, bound to `primary_source`.
pub fn fallback_tools(client: Arc<RegistryClient>, primary_source: &str) -> Vec<CatalogTool> {
    vec![
        WebSearchTool::new(Arc::clone(&client), primary_source).into_catalog_tool(),
        WebFetchTool::new(client, primary_source).into_catalog_tool(),
    ]
}

fn to_output<T: Serialize>(output: &T) -> Value {
    serde_json::to_value(output)
        .unwrap_or_else(|e| json!({ "error": format!("failed to encode tool output: {}", e) }))
}
