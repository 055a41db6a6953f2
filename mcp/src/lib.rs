//! Remote tool integration layer.
//!
//! Discovers tools advertised by registry sources, translates their schemas,
//! and exposes them to a model runtime through a single catalog. When the
//! primary source advertises nothing, built-in `web_search` and `web_fetch`
//! tools stand in for it.
//!
//! ## Modules
//!
//! - [`core`]: configuration, registry client, discovery cache, catalog
//! - [`inventory`]: catalog tool types and the ordered index
//! - [`schema`]: descriptor translation and argument validation
//! - [`builtin`]: fallback tools
//! - [`transform`]: normalization of raw tool results
//! - [`bridge`]: runtime payload builders
//! - [`service`]: status, details and refresh reports

pub mod error;
pub mod schema;
pub mod transform;

// Subsystems
pub mod bridge;
pub mod builtin;
pub mod core;
pub mod inventory;
pub mod service;

pub use core::{config, ToolCatalog, ToolsConfig};
pub use core::{
    CredentialProvider, MetricsSnapshot, NoCredentials, RegistryClient, SharedToolsConfig,
    SourceConfig, SourceProvider, StaticToken, ToolDescriptor,
};

pub use bridge::{build_function_tools_json, build_runtime_tools, RuntimeTool};
pub use builtin::{fallback_tools, WebFetchTool, WebSearchTool};
pub use error::{DiscoveryError, McpError, McpResult, SchemaViolation};
pub use inventory::{CatalogTool, QualifiedToolName, ToolCategory, ToolHandler, ToolIndex};
pub use schema::{translate, ObjectSchema, ValidatedSchema};
pub use service::{RefreshOutcome, ServiceStatus, ToolDetails, ToolService, ToolSummary};
pub use transform::{ResultNormalizer, WebFetchOutput, WebSearchOutput};
