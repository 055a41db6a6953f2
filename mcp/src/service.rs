//! Service surface: status, tool details, refresh, and tool calls.
//!
//! [`ToolService`] wires configuration, credentials, the registry client and
//! the catalog together. All reports serialize with camelCase keys.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::{
    bridge::{build_function_tools_json, build_runtime_tools, RuntimeTool},
    core::{
        catalog::ToolCatalog,
        client::RegistryClient,
        config::{SourceProvider, ToolsConfig},
        credentials::CredentialProvider,
        metrics::MetricsSnapshot,
    },
    error::{McpError, McpResult},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStatus {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub enabled: bool,
    pub connections: Vec<ConnectionStatus>,
    pub tools: Vec<String>,
    pub tool_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
    pub has_input_schema: bool,
    pub has_output_schema: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDetails {
    pub tools: Vec<ToolSummary>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub success: bool,
    pub tool_count: usize,
    pub tools: Vec<String>,
}

pub struct ToolService {
    provider: Arc<dyn SourceProvider>,
    catalog: Arc<ToolCatalog>,
}

impl ToolService {
    /// Build a service whose sources come from `config` itself.
    pub fn new(config: ToolsConfig, credentials: Arc<dyn CredentialProvider>) -> McpResult<Self> {
        let config = Arc::new(config);
        let provider: Arc<dyn SourceProvider> = config.clone();
        Self::with_provider(&config, provider, credentials)
    }

    /// Build a service reading sources from `provider` on every initialize and
    /// refresh; connection settings come from `config`.
    pub fn with_provider(
        config: &ToolsConfig,
        provider: Arc<dyn SourceProvider>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> McpResult<Self> {
        config.validate()?;
        let client = Arc::new(RegistryClient::new(config, credentials)?);
        let catalog = Arc::new(ToolCatalog::new(
            client,
            Arc::clone(&provider),
            config.primary_source.clone(),
        ));
        Ok(Self { provider, catalog })
    }

    pub async fn from_file(
        path: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> McpResult<Self> {
        let config = ToolsConfig::from_file(path).await?.with_env_proxy();
        Self::new(config, credentials)
    }

    pub fn catalog(&self) -> &Arc<ToolCatalog> {
        &self.catalog
    }

    pub async fn initialize(&self) {
        self.catalog.initialize().await;
    }

    pub fn status(&self) -> ServiceStatus {
        let connections = self
            .provider
            .sources()
            .into_iter()
            .map(|source| ConnectionStatus {
                name: source.name,
                description: source.description,
                kind: source.kind,
                enabled: source.enabled,
            })
            .collect();
        let tools = self.catalog.list_tool_names();

        ServiceStatus {
            enabled: self.provider.enabled(),
            connections,
            tool_count: tools.len(),
            tools,
        }
    }

    /// Per-tool summary. Only schema presence is reported, never the schemas.
    pub fn tool_details(&self) -> ToolDetails {
        let index = self.catalog.get_tools();
        let tools: Vec<ToolSummary> = index
            .iter()
            .map(|tool| ToolSummary {
                name: tool.name().to_string(),
                description: tool.description.clone(),
                has_input_schema: true,
                has_output_schema: tool.has_declared_output_schema(),
            })
            .collect();

        ToolDetails {
            count: tools.len(),
            tools,
        }
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.catalog.refresh().await;
        let tools = self.catalog.list_tool_names();
        info!("Tool refresh complete: {} tool(s)", tools.len());

        RefreshOutcome {
            success: true,
            tool_count: tools.len(),
            tools,
        }
    }

    /// Invoke a catalog tool by qualified name.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<Value> {
        let tool = self
            .catalog
            .get_tool(name)
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;
        tool.invoke(arguments).await
    }

    pub fn function_tools(&self) -> Vec<Value> {
        build_function_tools_json(&self.catalog.get_tools())
    }

    pub fn runtime_tools(&self) -> Vec<RuntimeTool> {
        build_runtime_tools(&self.catalog.get_tools())
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.catalog.client().metrics().snapshot()
    }
}
