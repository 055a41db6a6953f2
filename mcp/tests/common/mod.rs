//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod mock_registry;

use smg_tools::{SourceConfig, ToolsConfig};

/// Config pointing every source at `registry_url`.
pub fn config_for(registry_url: String, sources: &[&str]) -> ToolsConfig {
    ToolsConfig {
        registry_url: Some(registry_url),
        request_timeout_secs: 5,
        sources: sources.iter().map(|name| SourceConfig::new(*name)).collect(),
        ..Default::default()
    }
}
