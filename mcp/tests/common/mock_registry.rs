// tests/common/mock_registry.rs - Mock tool registry for testing
//
// Serves `POST /{source}` with `tools/list` and `tools/call` bodies. Responses
// are configured per source (and per tool for calls); every request is counted.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, Value),
    Text(u16, String),
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Reply::Json(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply::Text(status, body.to_string())
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(status, body) => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                Json(body),
            )
                .into_response(),
            Reply::Text(status, body) => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body,
            )
                .into_response(),
        }
    }
}

/// A recorded `tools/call` request.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub source: String,
    pub name: String,
    pub arguments: Value,
}

#[derive(Default)]
pub struct RegistryState {
    listings: Mutex<HashMap<String, Reply>>,
    calls: Mutex<HashMap<(String, String), Reply>>,
    list_requests: AtomicUsize,
    call_requests: AtomicUsize,
    recorded_calls: Mutex<Vec<RecordedCall>>,
    last_authorization: Mutex<Option<String>>,
}

pub struct MockRegistry {
    pub port: u16,
    state: Arc<RegistryState>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
}

impl MockRegistry {
    /// Start a mock registry on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(RegistryState::default());

        let app = Router::new()
            .route("/{source}", post(handle))
            .with_state(Arc::clone(&state));

        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock registry failed to start");
        });

        MockRegistry {
            port,
            state,
            server_handle: Some(server_handle),
        }
    }

    /// Base URL; sources live at `<url>/<source>`.
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }

    /// Advertise `tools` (a JSON array of descriptors) for `source`.
    pub fn set_tools(&self, source: &str, tools: Value) {
        self.set_listing(source, Reply::ok(json!({ "tools": tools })));
    }

    pub fn set_listing(&self, source: &str, reply: Reply) {
        self.state
            .listings
            .lock()
            .insert(source.to_string(), reply);
    }

    pub fn set_call(&self, source: &str, tool: &str, reply: Reply) {
        self.state
            .calls
            .lock()
            .insert((source.to_string(), tool.to_string()), reply);
    }

    pub fn list_requests(&self) -> usize {
        self.state.list_requests.load(Ordering::SeqCst)
    }

    pub fn call_requests(&self) -> usize {
        self.state.call_requests.load(Ordering::SeqCst)
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.state.recorded_calls.lock().clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().clone()
    }
}

impl Drop for MockRegistry {
    fn drop(&mut self) {
        if let Some(handle) = self.server_handle.take() {
            handle.abort();
        }
    }
}

async fn handle(
    State(state): State<Arc<RegistryState>>,
    Path(source): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    *state.last_authorization.lock() = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    match body.get("method").and_then(Value::as_str) {
        Some("tools/list") => {
            state.list_requests.fetch_add(1, Ordering::SeqCst);
            state
                .listings
                .lock()
                .get(&source)
                .cloned()
                .unwrap_or_else(|| Reply::ok(json!({ "tools": [] })))
        }
        Some("tools/call") => {
            state.call_requests.fetch_add(1, Ordering::SeqCst);
            let name = body["params"]["name"].as_str().unwrap_or_default().to_string();
            state.recorded_calls.lock().push(RecordedCall {
                source: source.clone(),
                name: name.clone(),
                arguments: body["params"]["arguments"].clone(),
            });
            state
                .calls
                .lock()
                .get(&(source, name))
                .cloned()
                .unwrap_or_else(|| Reply::status(404, "unknown tool"))
        }
        _ => Reply::status(400, "unknown method"),
    }
}
