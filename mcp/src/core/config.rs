//! Tool layer configuration types and utilities.
//!
//! Defines the registry connection settings, per-source records, cache and proxy
//! configuration, plus the [`SourceProvider`] seam through which the catalog
//! reads sources before every initialize/refresh.

use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{McpError, McpResult};

/// Source used by the fallback tools when none is configured.
pub const DEFAULT_PRIMARY_SOURCE: &str = "web";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Master switch for the whole layer.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base registry URL; a source without its own `url` is reached at
    /// `<registry_url>/<source name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,

    /// Source that backs the fallback tools and triggers their installation
    /// when it yields no tools.
    #[serde(default = "default_primary_source")]
    pub primary_source: String,

    /// Overall budget for a single registry call (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub cache: CacheConfig,

    /// Proxy for registry traffic only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,

    /// Ordered source list; order determines catalog insertion order.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// One configured registry source.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourceConfig {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Connection type label reported by status.
    #[serde(rename = "type", default = "default_source_type")]
    pub kind: String,

    /// Explicit endpoint; overrides `registry_url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Opaque extra settings, passed through untouched.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl SourceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind: default_source_type(),
            url: None,
            enabled: true,
            extra: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Discovery cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// How long a successful discovery is served from cache (seconds)
    #[serde(default = "default_tool_ttl")]
    pub tool_ttl: u64,
}

/// Proxy configuration for registry traffic (does NOT affect LLM API traffic)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// HTTP proxy URL (e.g., "http://proxy.internal:8080")
    pub http: Option<String>,

    /// HTTPS proxy URL
    pub https: Option<String>,

    /// Comma-separated hosts to exclude from proxying
    pub no_proxy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_primary_source() -> String {
    DEFAULT_PRIMARY_SOURCE.to_string()
}

fn default_source_type() -> String {
    "http".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_tool_ttl() -> u64 {
    300 // 5 minutes
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            tool_ttl: default_tool_ttl(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            registry_url: None,
            primary_source: default_primary_source(),
            request_timeout_secs: default_request_timeout(),
            cache: CacheConfig::default(),
            proxy: None,
            sources: Vec::new(),
        }
    }
}

impl ProxyConfig {
    /// Load proxy config from standard environment variables
    pub fn from_env() -> Option<Self> {
        let http = std::env::var("TOOLS_HTTP_PROXY")
            .ok()
            .or_else(|| std::env::var("HTTP_PROXY").ok());

        let https = std::env::var("TOOLS_HTTPS_PROXY")
            .ok()
            .or_else(|| std::env::var("HTTPS_PROXY").ok());

        let no_proxy = std::env::var("TOOLS_NO_PROXY")
            .ok()
            .or_else(|| std::env::var("NO_PROXY").ok());

        if http.is_some() || https.is_some() {
            Some(Self {
                http,
                https,
                no_proxy,
                username: None,
                password: None,
            })
        } else {
            None
        }
    }
}

impl ToolsConfig {
    /// Load configuration from a YAML file
    pub async fn from_file(path: &str) -> McpResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> McpResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge with environment-based proxy config
    pub fn with_env_proxy(mut self) -> Self {
        if self.proxy.is_none() {
            self.proxy = ProxyConfig::from_env();
        }
        self
    }

    /// Source names must be unique and non-empty.
    pub fn validate(&self) -> McpResult<()> {
        let mut seen = std::collections::HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(McpError::Config("source name must not be empty".into()));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(McpError::Config(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }
        if self.primary_source.trim().is_empty() {
            return Err(McpError::Config("primary_source must not be empty".into()));
        }
        Ok(())
    }

    pub fn tool_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.tool_ttl)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Supplies source records to the catalog.
///
/// Read before every initialize and refresh, so implementations may change
/// their answer between calls.
pub trait SourceProvider: Send + Sync {
    /// Global switch; a disabled layer yields an empty catalog.
    fn enabled(&self) -> bool;

    /// All configured sources in catalog order, enabled or not.
    fn sources(&self) -> Vec<SourceConfig>;

    fn enabled_sources(&self) -> Vec<SourceConfig> {
        if !self.enabled() {
            return Vec::new();
        }
        self.sources().into_iter().filter(|s| s.enabled).collect()
    }
}

impl SourceProvider for ToolsConfig {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn sources(&self) -> Vec<SourceConfig> {
        self.sources.clone()
    }
}

/// Source configuration that can be swapped at runtime.
#[derive(Clone, Default)]
pub struct SharedToolsConfig {
    inner: Arc<RwLock<ToolsConfig>>,
}

impl SharedToolsConfig {
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn snapshot(&self) -> ToolsConfig {
        self.inner.read().clone()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.write().enabled = enabled;
    }

    pub fn set_sources(&self, sources: Vec<SourceConfig>) {
        self.inner.write().sources = sources;
    }
}

impl SourceProvider for SharedToolsConfig {
    fn enabled(&self) -> bool {
        self.inner.read().enabled
    }

    fn sources(&self) -> Vec<SourceConfig> {
        self.inner.read().sources.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ToolsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.primary_source, "web");
        assert_eq!(config.cache.tool_ttl, 300);
        assert_eq!(config.tool_ttl(), Duration::from_secs(300));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_yaml_minimal_config() {
        let yaml = r#"
registry_url: "http://localhost:3000/mcp"
sources:
  - name: "web"
"#;

        let config = ToolsConfig::from_yaml(yaml).expect("Failed to parse YAML");
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].name, "web");
        assert!(config.sources[0].enabled); // Should default to true
        assert_eq!(config.sources[0].kind, "http");
        assert!(config.sources[0].url.is_none());
        assert_eq!(config.cache.tool_ttl, 300);
    }

    #[test]
    fn test_yaml_full_config() {
        let yaml = r#"
enabled: true
registry_url: "https://registry.example.com/mcp"
primary_source: "search"
request_timeout_secs: 10

cache:
  tool_ttl: 60

proxy:
  http: "http://proxy:8080"
  no_proxy: "localhost"

sources:
  - name: "search"
    description: "Web search and fetch"
    type: "streamable"
    api_version: 2
  - name: "docs"
    description: "Library documentation"
    url: "https://docs.example.com/mcp"
    enabled: false
"#;

        let config = ToolsConfig::from_yaml(yaml).expect("Failed to parse YAML");
        assert_eq!(config.primary_source, "search");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.cache.tool_ttl, 60);
        assert_eq!(config.proxy.as_ref().unwrap().http.as_deref(), Some("http://proxy:8080"));

        let search = &config.sources[0];
        assert_eq!(search.kind, "streamable");
        assert_eq!(search.extra.get("api_version"), Some(&serde_json::json!(2)));

        let docs = &config.sources[1];
        assert!(!docs.enabled);
        assert_eq!(docs.url.as_deref(), Some("https://docs.example.com/mcp"));
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let yaml = r#"
sources:
  - name: "web"
  - name: "web"
"#;
        let err = ToolsConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, McpError::Config(_)));
    }

    #[test]
    fn test_enabled_sources_filters() {
        let config = ToolsConfig {
            sources: vec![
                SourceConfig::new("a"),
                SourceConfig::new("b").with_enabled(false),
                SourceConfig::new("c"),
            ],
            ..Default::default()
        };

        let names: Vec<_> = config
            .enabled_sources()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_disabled_layer_has_no_sources() {
        let config = ToolsConfig {
            enabled: false,
            sources: vec![SourceConfig::new("a")],
            ..Default::default()
        };
        assert!(config.enabled_sources().is_empty());
    }

    #[test]
    fn test_shared_config_updates() {
        let shared = SharedToolsConfig::new(ToolsConfig::default());
        assert!(shared.enabled_sources().is_empty());

        shared.set_sources(vec![SourceConfig::new("web")]);
        assert_eq!(shared.enabled_sources().len(), 1);

        shared.set_enabled(false);
        assert!(shared.enabled_sources().is_empty());
        assert!(!shared.snapshot().enabled);
    }
}
