#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// One request seen by the stub upstream.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct StubState {
    fixtures: Arc<StdMutex<HashMap<String, (u16, Value)>>>,
    requests: Arc<StdMutex<Vec<RecordedRequest>>>,
}

/// In-process stand-in for the cost API. Unknown paths answer 404.
pub struct UpstreamStub {
    base_url: String,
    state: StubState,
    server: tokio::task::JoinHandle<()>,
}

impl UpstreamStub {
    /// Starts a stub whose identity endpoint reports the given token scope.
    pub async fn start(scope: &[&str]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        let state = StubState {
            fixtures: Arc::new(StdMutex::new(HashMap::new())),
            requests: Arc::new(StdMutex::new(Vec::new())),
        };
        let app = Router::new().fallback(handle_any).with_state(state.clone());
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        let stub = Self {
            base_url: format!("http://{}", addr),
            state,
            server,
        };
        stub.respond(
            "/v2/me",
            200,
            json!({
                "default_workspace_token": "wrkspc_1",
                "workspaces": [{"token": "wrkspc_1", "name": "Main"}],
                "bearer_token": {"token": "tok", "scope": scope}
            }),
        );
        stub
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn respond(&self, path: &str, status: u16, body: Value) {
        self.state
            .fixtures
            .lock()
            .expect("fixtures lock")
            .insert(path.to_string(), (status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("requests lock").clone()
    }

    /// Requests other than the startup identity check.
    pub fn tool_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|req| req.path != "/v2/me")
            .collect()
    }
}

impl Drop for UpstreamStub {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle_any(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let query = uri
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default();
    let path = uri.path().to_string();
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            query,
            authorization: header("authorization"),
            user_agent: header("user-agent"),
            body: serde_json::from_slice(&body).ok(),
        });

    let fixture = state
        .fixtures
        .lock()
        .expect("fixtures lock")
        .get(&path)
        .cloned();
    match fixture {
        Some((204, _)) => StatusCode::NO_CONTENT.into_response(),
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(body),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"errors": [format!("No route for {}", path)]})),
        )
            .into_response(),
    }
}
