//! `web_fetch` fallback tool.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::{to_output, WEB_FETCH};
use crate::{
    core::client::RegistryClient,
    error::{McpError, McpResult},
    inventory::{CatalogTool, QualifiedToolName, ToolCategory, ToolHandler},
    schema::{ObjectSchema, ValidatedSchema},
    transform::{ResultNormalizer, WebFetchOutput},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebFetchArgs {
    url: String,
    #[serde(default)]
    extract_text: Option<bool>,
    #[serde(default)]
    summarize: Option<bool>,
}

pub struct WebFetchTool {
    client: Arc<RegistryClient>,
    source: String,
}

impl WebFetchTool {
    pub fn new(client: Arc<RegistryClient>, source: impl Into<String>) -> Self {
        Self {
            client,
            source: source.into(),
        }
    }

    pub fn input_schema() -> ValidatedSchema {
        ValidatedSchema::Object(
            ObjectSchema::new()
                .required("url", ValidatedSchema::string())
                .describe("URL of the page to fetch")
                .optional("extractText", ValidatedSchema::boolean())
                .describe("Return readable text instead of raw markup (default true)")
                .optional("summarize", ValidatedSchema::boolean())
                .describe("Summarize the page content (default false)"),
        )
    }

    pub fn output_schema() -> ValidatedSchema {
        ValidatedSchema::Object(
            ObjectSchema::new()
                .optional("title", ValidatedSchema::string())
                .required("content", ValidatedSchema::string())
                .required("url", ValidatedSchema::string())
                .required("fetchedAt", ValidatedSchema::string())
                .optional("error", ValidatedSchema::string()),
        )
    }

    pub fn into_catalog_tool(self) -> CatalogTool {
        CatalogTool::new(
            QualifiedToolName::unscoped(WEB_FETCH),
            "Fetch a web page and return its content.",
            Self::input_schema(),
            Arc::new(self),
        )
        .with_output_schema(Self::output_schema())
        .with_category(ToolCategory::Fallback)
    }

    fn failure(url: String, message: String) -> Value {
        to_output(&WebFetchOutput {
            title: None,
            content: String::new(),
            url,
            fetched_at: now(),
            error: Some(message),
        })
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl ToolHandler for WebFetchTool {
    async fn call(&self, arguments: Value) -> McpResult<Value> {
        let requested_url = arguments
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if let Err(violation) = Self::input_schema().validate(&arguments) {
            warn!("Rejected web_fetch arguments: {}", violation);
            return Ok(Self::failure(
                requested_url,
                McpError::from(violation).user_message(),
            ));
        }
        let args: WebFetchArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!("Rejected web_fetch arguments: {}", e);
                return Ok(Self::failure(
                    requested_url,
                    format!("Invalid fetch arguments: {}", e),
                ));
            }
        };

        let request = json!({
            "url": args.url,
            "extractText": args.extract_text.unwrap_or(true),
            "summarize": args.summarize.unwrap_or(false),
        });
        match self
            .client
            .invoke_tool(&self.source, WEB_FETCH, request)
            .await
        {
            Ok(result) => {
                let page = ResultNormalizer::fetched_page(&result, &args.url);
                Ok(to_output(&WebFetchOutput {
                    title: page.title,
                    content: page.content,
                    url: page.url,
                    fetched_at: now(),
                    error: None,
                }))
            }
            Err(e) => Ok(Self::failure(args.url, e.user_message())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{config::ToolsConfig, credentials::NoCredentials};

    #[test]
    fn test_input_schema() {
        let schema = WebFetchTool::input_schema();
        assert!(schema.validate(&json!({"url": "https://example.com"})).is_ok());
        assert!(schema
            .validate(&json!({"url": "https://example.com", "extractText": false, "summarize": true}))
            .is_ok());
        assert!(schema.validate(&json!({"summarize": true})).is_err());
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_structured() {
        let client = Arc::new(
            RegistryClient::new(&ToolsConfig::default(), Arc::new(NoCredentials)).unwrap(),
        );
        let tool = WebFetchTool::new(Arc::clone(&client), "web");

        let out = tool.call(json!({"url": 42})).await.unwrap();
        assert_eq!(out["content"], "");
        assert_eq!(out["url"], "");
        assert!(out["error"].as_str().unwrap().contains("url"));
        assert_eq!(client.metrics().snapshot().total_calls, 0);
    }

    #[test]
    fn test_failure_output() {
        let failure = WebFetchTool::failure("https://example.com".to_string(), "down".to_string());
        assert_eq!(failure["content"], "");
        assert_eq!(failure["url"], "https://example.com");
        assert_eq!(failure["error"], "down");
        assert!(failure["fetchedAt"].as_str().is_some_and(|s| s.ends_with('Z')));
        assert!(WebFetchTool::output_schema().validate(&failure).is_ok());
    }
}
