//! HTTP proxy configuration for registry connections.
//!
//! Applies proxy settings to the client builder used for every registry call.

use super::config::ProxyConfig;
use crate::error::{McpError, McpResult};

fn build_proxy(mut proxy: reqwest::Proxy, proxy_cfg: &ProxyConfig) -> reqwest::Proxy {
    // Apply no_proxy exclusions
    if let Some(ref no_proxy) = proxy_cfg.no_proxy {
        proxy = proxy.no_proxy(reqwest::NoProxy::from_string(no_proxy));
    }

    // Apply authentication if configured
    if let (Some(ref username), Some(ref password)) = (&proxy_cfg.username, &proxy_cfg.password) {
        proxy = proxy.basic_auth(username, password);
    }

    proxy
}

/// Apply proxy configuration to a ClientBuilder
///
/// Leaves the builder open so timeouts and other settings can be added afterward.
pub(crate) fn apply_proxy_to_builder(
    mut builder: reqwest::ClientBuilder,
    proxy_cfg: &ProxyConfig,
) -> McpResult<reqwest::ClientBuilder> {
    if let Some(ref http_proxy) = proxy_cfg.http {
        let proxy = reqwest::Proxy::http(http_proxy)
            .map_err(|e| McpError::Config(format!("Invalid HTTP proxy: {}", e)))?;
        builder = builder.proxy(build_proxy(proxy, proxy_cfg));
    }

    if let Some(ref https_proxy) = proxy_cfg.https {
        let proxy = reqwest::Proxy::https(https_proxy)
            .map_err(|e| McpError::Config(format!("Invalid HTTPS proxy: {}", e)))?;
        builder = builder.proxy(build_proxy(proxy, proxy_cfg));
    }

    Ok(builder)
}
