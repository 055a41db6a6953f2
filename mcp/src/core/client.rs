//! Remote registry client: discovery, invocation, and the discovery cache.
//!
//! Every registry call is a JSON `POST` to the source's endpoint:
//! - discovery: `{"method": "tools/list"}`
//! - invocation: `{"method": "tools/call", "params": {"name", "arguments"}}`
//!
//! Discovery is fail-open: any failure is logged and collapses to an empty
//! list. Invocation failures are returned to the caller as [`McpError`].

use std::{sync::Arc, time::Instant};

use dashmap::DashMap;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::{
    cache::DiscoveryCache,
    config::{SourceConfig, ToolsConfig},
    credentials::CredentialProvider,
    metrics::ClientMetrics,
    proxy::apply_proxy_to_builder,
};
use crate::error::{DiscoveryError, McpError, McpResult};

/// Upstream error bodies are cut to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Tool as advertised by a registry source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "input_schema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

pub struct RegistryClient {
    http: reqwest::Client,
    registry_url: Option<Url>,
    endpoints: DashMap<String, Url>,
    credentials: Arc<dyn CredentialProvider>,
    cache: DiscoveryCache,
    metrics: Arc<ClientMetrics>,
}

impl RegistryClient {
    pub fn new(config: &ToolsConfig, credentials: Arc<dyn CredentialProvider>) -> McpResult<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.request_timeout());
        if let Some(proxy) = &config.proxy {
            builder = apply_proxy_to_builder(builder, proxy)?;
        }
        let http = builder
            .build()
            .map_err(|e| McpError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let registry_url = config
            .registry_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw)
                    .map_err(|e| McpError::Config(format!("Invalid registry_url '{}': {}", raw, e)))
            })
            .transpose()?;

        let client = Self {
            http,
            registry_url,
            endpoints: DashMap::new(),
            credentials,
            cache: DiscoveryCache::new(config.tool_ttl()),
            metrics: Arc::new(ClientMetrics::new()),
        };

        for source in &config.sources {
            if let Err(e) = client.register_source(source) {
                warn!("Ignoring endpoint for source '{}': {}", source.name, e);
            }
        }

        Ok(client)
    }

    /// Record an explicit endpoint for `source`, if it has one.
    pub fn register_source(&self, source: &SourceConfig) -> McpResult<()> {
        if let Some(raw) = &source.url {
            let url = Url::parse(raw)
                .map_err(|e| McpError::Config(format!("Invalid url '{}': {}", raw, e)))?;
            self.endpoints.insert(source.name.clone(), url);
        }
        Ok(())
    }

    /// Make explicit endpoints match `sources` exactly: entries for sources that
    /// are gone or no longer carry a `url` are dropped, the rest re-registered.
    pub fn sync_endpoints(&self, sources: &[SourceConfig]) {
        self.endpoints.retain(|name, _| {
            sources
                .iter()
                .any(|source| &source.name == name && source.url.is_some())
        });
        for source in sources {
            if let Err(e) = self.register_source(source) {
                warn!("Ignoring endpoint for source '{}': {}", source.name, e);
                self.endpoints.remove(&source.name);
            }
        }
    }

    /// Endpoint for `source`: explicit registration first, then `<registry_url>/<source>`.
    pub fn endpoint(&self, source: &str) -> Option<Url> {
        if let Some(url) = self.endpoints.get(source) {
            return Some(url.clone());
        }
        let mut url = self.registry_url.clone()?;
        url.path_segments_mut().ok()?.pop_if_empty().push(source);
        Some(url)
    }

    pub fn metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.metrics)
    }

    /// List tools for `source`, served from cache while fresh. Never fails.
    pub async fn discover_tools(&self, source: &str) -> Vec<ToolDescriptor> {
        if let Some(tools) = self.cache.get(source) {
            debug!("Serving {} cached tool(s) for source '{}'", tools.len(), source);
            self.metrics.record_cache_hit();
            return tools.as_ref().clone();
        }
        self.metrics.record_cache_miss();

        match self.fetch_tools(source).await {
            Ok(tools) => {
                info!("Discovered {} tool(s) from source '{}'", tools.len(), source);
                self.cache.insert(source, tools).as_ref().clone()
            }
            Err(e) => {
                warn!("Tool discovery for source '{}' degraded: {}", source, e);
                self.metrics.record_discovery_failure();
                self.cache.remove(source);
                Vec::new()
            }
        }
    }

    async fn fetch_tools(&self, source: &str) -> Result<Vec<ToolDescriptor>, DiscoveryError> {
        let url = self
            .endpoint(source)
            .ok_or_else(|| DiscoveryError::UnknownSource(source.to_string()))?;
        let token = self
            .credentials
            .bearer_token()
            .await
            .map_err(|e| DiscoveryError::Credentials(e.to_string()))?;

        let response = self
            .request(url, token.as_deref(), &json!({ "method": "tools/list" }))
            .send()
            .await
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Malformed(e.to_string()))?;
        parse_tool_listing(source, body)
    }

    /// Call `tool_name` on `source`.
    pub async fn invoke_tool(
        &self,
        source: &str,
        tool_name: &str,
        arguments: Value,
    ) -> McpResult<Value> {
        let started = Instant::now();
        let result = self.call(source, tool_name, arguments).await;
        self.metrics.record_call(
            source,
            tool_name,
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );
        if let Err(ref e) = result {
            warn!("Tool '{}' on source '{}' failed: {}", tool_name, source, e);
        }
        result
    }

    async fn call(&self, source: &str, tool_name: &str, arguments: Value) -> McpResult<Value> {
        let url = self
            .endpoint(source)
            .ok_or_else(|| McpError::SourceNotFound(source.to_string()))?;
        let token = self.credentials.bearer_token().await.map_err(|e| match e {
            McpError::Auth(_) => e,
            other => McpError::Auth(other.to_string()),
        })?;

        let body = json!({
            "method": "tools/call",
            "params": { "name": tool_name, "arguments": arguments },
        });
        let response = self
            .request(url, token.as_deref(), &body)
            .send()
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text.chars().take(MAX_ERROR_BODY_CHARS).collect()
            };
            return Err(McpError::invocation(Some(status.as_u16()), message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| McpError::invocation(None, format!("malformed response body: {}", e)))?;
        extract_call_result(body)
    }

    /// Drop cached discovery for one source, or for all when `None`.
    pub fn invalidate(&self, source: Option<&str>) {
        match source {
            Some(source) => {
                debug!("Invalidating tool cache for source '{}'", source);
                self.cache.remove(source);
            }
            None => {
                debug!("Invalidating tool cache for all sources");
                self.cache.clear();
            }
        }
    }

    fn request(&self, url: Url, token: Option<&str>, body: &Value) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Accepts `{"tools": [...]}` or a bare array. Entries without a usable name are skipped.
fn parse_tool_listing(source: &str, body: Value) -> Result<Vec<ToolDescriptor>, DiscoveryError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("tools") {
            Some(Value::Array(items)) => items,
            _ => return Err(DiscoveryError::Malformed("missing 'tools' array".into())),
        },
        _ => return Err(DiscoveryError::Malformed("expected object or array".into())),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ToolDescriptor>(item) {
            Ok(descriptor) if !descriptor.name.trim().is_empty() => Some(descriptor),
            Ok(_) => {
                warn!("Skipping unnamed tool from source '{}'", source);
                None
            }
            Err(e) => {
                warn!("Skipping invalid tool from source '{}': {}", source, e);
                None
            }
        })
        .collect())
}

/// Priority: `result`, then `content`, then the raw body.
fn extract_call_result(body: Value) -> McpResult<Value> {
    if let Some(obj) = body.as_object() {
        for key in ["result", "content"] {
            if let Some(value) = obj.get(key).filter(|v| !v.is_null()) {
                return Ok(value.clone());
            }
        }
        if let Some(err) = obj.get("error").filter(|v| !v.is_null()) {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| err.to_string());
            return Err(McpError::invocation(None, message));
        }
    }
    Ok(body)
}
