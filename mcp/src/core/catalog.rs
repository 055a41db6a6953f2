//! Tool catalog: discovered remote tools plus the fallback set.
//!
//! The catalog owns one published [`ToolIndex`] snapshot. `initialize` and
//! `refresh` build a complete index off to the side and swap it in under a
//! single write, so a reader either sees the previous catalog or the new one,
//! never a partially populated one. Writers are serialized by an async lock;
//! readers never wait on discovery.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{
    client::{RegistryClient, ToolDescriptor},
    config::{SourceConfig, SourceProvider},
};
use crate::{
    builtin::fallback_tools,
    error::McpResult,
    inventory::{CatalogTool, QualifiedToolName, ToolHandler, ToolIndex},
    schema::translate,
};

/// Forwards calls for one discovered tool to its source.
struct RemoteTool {
    client: Arc<RegistryClient>,
    source: String,
    tool_name: String,
}

#[async_trait]
impl ToolHandler for RemoteTool {
    async fn call(&self, arguments: Value) -> McpResult<Value> {
        self.client
            .invoke_tool(&self.source, &self.tool_name, arguments)
            .await
    }
}

#[derive(Default)]
struct CatalogState {
    index: Arc<ToolIndex>,
    initialized: bool,
}

pub struct ToolCatalog {
    client: Arc<RegistryClient>,
    provider: Arc<dyn SourceProvider>,
    primary_source: String,
    state: RwLock<CatalogState>,
    init_lock: Mutex<()>,
}

impl ToolCatalog {
    pub fn new(
        client: Arc<RegistryClient>,
        provider: Arc<dyn SourceProvider>,
        primary_source: impl Into<String>,
    ) -> Self {
        Self {
            client,
            provider,
            primary_source: primary_source.into(),
            state: RwLock::new(CatalogState::default()),
            init_lock: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &Arc<RegistryClient> {
        &self.client
    }

    pub fn primary_source(&self) -> &str {
        &self.primary_source
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }

    /// Populate the catalog from the provider's enabled sources.
    ///
    /// No-op once initialized. Never fails: unreachable sources contribute
    /// nothing, and an empty primary source installs the fallback tools.
    pub async fn initialize(&self) {
        let sources = self.provider.enabled_sources();
        self.initialize_sources(&sources).await;
    }

    /// Like [`initialize`](Self::initialize), with an explicit source list.
    /// Entries with `enabled: false` are skipped.
    pub async fn initialize_sources(&self, sources: &[SourceConfig]) {
        if self.is_initialized() {
            debug!("Tool catalog already initialized");
            return;
        }

        let _guard = self.init_lock.lock().await;
        if self.is_initialized() {
            return;
        }

        let index = self.build_index(sources).await;
        self.publish(index);
    }

    /// Drop every cached discovery result and rebuild from the provider's
    /// current sources. Readers keep the previous catalog until the rebuild
    /// completes.
    pub async fn refresh(&self) {
        let _guard = self.init_lock.lock().await;
        info!("Refreshing tool catalog");

        self.client.invalidate(None);
        let sources = self.provider.enabled_sources();
        let index = self.build_index(&sources).await;
        self.publish(index);
    }

    /// Current snapshot. Empty (with a warning) before initialization.
    pub fn get_tools(&self) -> Arc<ToolIndex> {
        let state = self.state.read();
        if !state.initialized {
            warn!("Tool catalog read before initialization; returning no tools");
        }
        Arc::clone(&state.index)
    }

    pub fn get_tool(&self, name: &str) -> Option<CatalogTool> {
        self.state.read().index.get(name).cloned()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.state.read().index.contains(name)
    }

    /// Qualified names in source order, then discovery order.
    pub fn list_tool_names(&self) -> Vec<String> {
        self.state.read().index.names()
    }

    fn publish(&self, index: ToolIndex) {
        let count = index.len();
        let mut state = self.state.write();
        state.index = Arc::new(index);
        state.initialized = true;
        info!("Tool catalog ready with {} tool(s)", count);
    }

    async fn build_index(&self, sources: &[SourceConfig]) -> ToolIndex {
        let sources: Vec<SourceConfig> = sources.iter().filter(|s| s.enabled).cloned().collect();
        let mut index = ToolIndex::new();
        if sources.is_empty() {
            info!("No enabled tool sources configured");
            return index;
        }

        self.client.sync_endpoints(&sources);

        let discovered = join_all(
            sources
                .iter()
                .map(|source| self.client.discover_tools(&source.name)),
        )
        .await;

        for (source, descriptors) in sources.iter().zip(discovered) {
            if descriptors.is_empty() && source.name == self.primary_source {
                info!(
                    "Primary source '{}' returned no tools, installing fallback tools",
                    source.name
                );
                for tool in fallback_tools(Arc::clone(&self.client), &self.primary_source) {
                    index.insert(tool);
                }
                continue;
            }

            for descriptor in descriptors {
                index.insert(self.remote_tool(&source.name, descriptor));
            }
        }

        index
    }

    fn remote_tool(&self, source: &str, descriptor: ToolDescriptor) -> CatalogTool {
        let input_schema = translate(descriptor.input_schema.as_ref());
        let handler = RemoteTool {
            client: Arc::clone(&self.client),
            source: source.to_string(),
            tool_name: descriptor.name.clone(),
        };
        CatalogTool::new(
            QualifiedToolName::new(source, &descriptor.name),
            descriptor.description.unwrap_or_default(),
            input_schema,
            Arc::new(handler),
        )
        .with_source(source)
    }
}
