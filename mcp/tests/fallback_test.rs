//! Fallback tools against a mock registry.

mod common;

use std::sync::Arc;

use common::{
    config_for,
    mock_registry::{MockRegistry, Reply},
};
use serde_json::{json, Value};
use smg_tools::{NoCredentials, RegistryClient, ToolCatalog};

async fn fallback_catalog(registry: &MockRegistry) -> ToolCatalog {
    registry.set_tools("web", json!([]));
    let config = config_for(registry.url(), &["web"]);
    let client = Arc::new(RegistryClient::new(&config, Arc::new(NoCredentials)).unwrap());
    let catalog = ToolCatalog::new(client, Arc::new(config), "web");
    catalog.initialize().await;
    catalog
}

async fn call(catalog: &ToolCatalog, name: &str, arguments: Value) -> Value {
    catalog
        .get_tool(name)
        .unwrap()
        .invoke(arguments)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_web_search_delegates_to_primary() {
    let registry = MockRegistry::start().await;
    registry.set_call(
        "web",
        "web_search",
        Reply::ok(json!({"result": {"results": [
            {"title": "Rust", "url": "https://rust-lang.org", "description": "A language"},
            {"title": "Crates", "url": "https://crates.io", "snippet": "Registry", "page_age": "2024-01-01"}
        ]}})),
    );
    let catalog = fallback_catalog(&registry).await;

    let out = call(&catalog, "web_search", json!({"query": "rust"})).await;
    assert_eq!(
        out,
        json!({"results": [
            {"title": "Rust", "url": "https://rust-lang.org", "snippet": "A language"},
            {"title": "Crates", "url": "https://crates.io", "snippet": "Registry", "publishedDate": "2024-01-01"}
        ]})
    );

    let calls = registry.recorded_calls();
    assert_eq!(calls[0].source, "web");
    assert_eq!(calls[0].name, "web_search");
    assert_eq!(calls[0].arguments, json!({"query": "rust", "maxResults": 10}));
}

#[tokio::test]
async fn test_web_search_limits_results() {
    let registry = MockRegistry::start().await;
    registry.set_call(
        "web",
        "web_search",
        Reply::ok(json!({"result": [
            {"url": "https://a.example"},
            {"url": "https://b.example"},
            {"url": "https://c.example"}
        ]})),
    );
    let catalog = fallback_catalog(&registry).await;

    let out = call(&catalog, "web_search", json!({"query": "x", "maxResults": 2})).await;
    assert_eq!(out["results"].as_array().unwrap().len(), 2);
    assert_eq!(registry.recorded_calls()[0].arguments["maxResults"], 2);
}

#[tokio::test]
async fn test_failing_web_search_is_structured() {
    let registry = MockRegistry::start().await;
    registry.set_call("web", "web_search", Reply::status(500, "stack trace at line 42"));
    let catalog = fallback_catalog(&registry).await;

    let out = call(&catalog, "web_search", json!({"query": "rust"})).await;
    assert_eq!(out["results"], json!([]));
    let error = out["error"].as_str().unwrap();
    assert!(!error.is_empty());
    assert!(!error.contains("stack trace"));
}

#[tokio::test]
async fn test_web_fetch_returns_page() {
    let registry = MockRegistry::start().await;
    registry.set_call(
        "web",
        "web_fetch",
        Reply::ok(json!({"result": {"title": "Example Domain", "content": "Example body"}})),
    );
    let catalog = fallback_catalog(&registry).await;

    let out = call(&catalog, "web_fetch", json!({"url": "https://example.com"})).await;
    assert_eq!(out["title"], "Example Domain");
    assert_eq!(out["content"], "Example body");
    assert_eq!(out["url"], "https://example.com");
    assert!(out["fetchedAt"].is_string());
    assert!(out.get("error").is_none());

    assert_eq!(
        registry.recorded_calls()[0].arguments,
        json!({"url": "https://example.com", "extractText": true, "summarize": false})
    );
}

#[tokio::test]
async fn test_web_fetch_from_content_blocks() {
    let registry = MockRegistry::start().await;
    registry.set_call(
        "web",
        "web_fetch",
        Reply::ok(json!({"content": [
            {"type": "text", "text": "line one"},
            {"type": "text", "text": "line two"}
        ]})),
    );
    let catalog = fallback_catalog(&registry).await;

    let out = call(
        &catalog,
        "web_fetch",
        json!({"url": "https://example.com", "extractText": false}),
    )
    .await;
    assert_eq!(out["content"], "line one\nline two");
    assert_eq!(registry.recorded_calls()[0].arguments["extractText"], false);
}

#[tokio::test]
async fn test_failing_web_fetch_is_structured() {
    let registry = MockRegistry::start().await;
    registry.set_call("web", "web_fetch", Reply::status(502, "bad gateway"));
    let catalog = fallback_catalog(&registry).await;

    let out = call(&catalog, "web_fetch", json!({"url": "https://example.com/a"})).await;
    assert_eq!(out["content"], "");
    assert_eq!(out["url"], "https://example.com/a");
    assert!(out["fetchedAt"].is_string());
    assert!(out["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_fallback_invalid_arguments_are_structured() {
    let registry = MockRegistry::start().await;
    let catalog = fallback_catalog(&registry).await;

    let out = call(&catalog, "web_fetch", json!({})).await;
    assert_eq!(out["content"], "");
    assert!(out["error"].as_str().is_some_and(|e| e.contains("url")));

    let out = call(&catalog, "web_search", json!({"query": 5})).await;
    assert_eq!(out["results"], json!([]));
    assert!(out["error"].is_string());

    assert_eq!(registry.call_requests(), 0);
}
