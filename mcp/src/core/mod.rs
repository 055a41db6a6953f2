//! Core registry infrastructure.

pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod credentials;
pub mod metrics;
pub(crate) mod proxy;

pub use cache::{CacheEntry, DiscoveryCache};
pub use catalog::ToolCatalog;
pub use client::{RegistryClient, ToolDescriptor};
pub use config::{
    CacheConfig, ProxyConfig, SharedToolsConfig, SourceConfig, SourceProvider, ToolsConfig,
    DEFAULT_PRIMARY_SOURCE,
};
pub use credentials::{CredentialProvider, NoCredentials, StaticToken};
pub use metrics::{ClientMetrics, LatencySnapshot, MetricsSnapshot};
