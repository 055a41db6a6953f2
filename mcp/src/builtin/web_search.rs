//! `web_search` fallback tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::{to_output, WEB_SEARCH};
use crate::{
    core::client::RegistryClient,
    error::{McpError, McpResult},
    inventory::{CatalogTool, QualifiedToolName, ToolCategory, ToolHandler},
    schema::{ObjectSchema, ValidatedSchema},
    transform::{ResultNormalizer, WebSearchOutput},
};

pub const DEFAULT_MAX_RESULTS: usize = 10;
/// Upper bound on `maxResults` forwarded to the registry.
pub const MAX_RESULTS_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebSearchArgs {
    query: String,
    #[serde(default)]
    max_results: Option<f64>,
}

impl WebSearchArgs {
    fn limit(&self) -> usize {
        self.max_results
            .filter(|n| n.is_finite() && *n >= 1.0)
            .map(|n| n.min(MAX_RESULTS_LIMIT as f64) as usize)
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }
}

pub struct WebSearchTool {
    client: Arc<RegistryClient>,
    source: String,
}

impl WebSearchTool {
    pub fn new(client: Arc<RegistryClient>, source: impl Into<String>) -> Self {
        Self {
            client,
            source: source.into(),
        }
    }

    pub fn input_schema() -> ValidatedSchema {
        ValidatedSchema::Object(
            ObjectSchema::new()
                .required("query", ValidatedSchema::string())
                .describe("Search query")
                .optional("maxResults", ValidatedSchema::number())
                .describe("Maximum number of results to return (default 10, at most 50)"),
        )
    }

    pub fn output_schema() -> ValidatedSchema {
        let hit = ObjectSchema::new()
            .required("title", ValidatedSchema::string())
            .required("url", ValidatedSchema::string())
            .required("snippet", ValidatedSchema::string())
            .optional("publishedDate", ValidatedSchema::string());
        ValidatedSchema::Object(
            ObjectSchema::new()
                .required(
                    "results",
                    ValidatedSchema::sequence(ValidatedSchema::Object(hit)),
                )
                .optional("error", ValidatedSchema::string()),
        )
    }

    pub fn into_catalog_tool(self) -> CatalogTool {
        CatalogTool::new(
            QualifiedToolName::unscoped(WEB_SEARCH),
            "Search the web for current information. Returns a list of results with title, URL and snippet.",
            Self::input_schema(),
            Arc::new(self),
        )
        .with_output_schema(Self::output_schema())
        .with_category(ToolCategory::Fallback)
    }

    fn failure(message: String) -> Value {
        to_output(&WebSearchOutput {
            results: Vec::new(),
            error: Some(message),
        })
    }
}

#[async_trait]
impl ToolHandler for WebSearchTool {
    async fn call(&self, arguments: Value) -> McpResult<Value> {
        if let Err(violation) = Self::input_schema().validate(&arguments) {
            warn!("Rejected web_search arguments: {}", violation);
            return Ok(Self::failure(McpError::from(violation).user_message()));
        }
        let args: WebSearchArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!("Rejected web_search arguments: {}", e);
                return Ok(Self::failure(format!("Invalid search arguments: {}", e)));
            }
        };
        let limit = args.limit();

        let request = json!({ "query": args.query, "maxResults": limit });
        match self
            .client
            .invoke_tool(&self.source, WEB_SEARCH, request)
            .await
        {
            Ok(result) => Ok(to_output(&WebSearchOutput {
                results: ResultNormalizer::search_hits(&result, limit),
                error: None,
            })),
            Err(e) => Ok(Self::failure(e.user_message())),
        }
    }
}
