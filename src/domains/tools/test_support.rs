//! In-process mock of the upstream API for tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// One request received by the mock.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

/// Answers every POST with a fixed status and body after `delay`.
#[derive(Clone)]
pub struct MockUpstream {
    status: StatusCode,
    /// `None` answers with an empty body.
    body: Option<Value>,
    delay: Duration,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(mock): State<MockUpstream>,
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
    mock.requests.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        api_key: header("x-api-key"),
        content_type: header("content-type"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    tokio::time::sleep(mock.delay).await;
    match &mock.body {
        Some(body) => (mock.status, Json(body.clone())).into_response(),
        None => mock.status.into_response(),
    }
}

/// Start a mock on an ephemeral port; returns its base URL.
pub async fn spawn_mock(status: u16, body: Value, delay: Duration) -> (String, MockUpstream) {
    serve_mock(status, Some(body), delay).await
}

/// Start a mock that answers with `status` and no body.
pub async fn spawn_empty_mock(status: u16) -> (String, MockUpstream) {
    serve_mock(status, None, Duration::ZERO).await
}

async fn serve_mock(status: u16, body: Option<Value>, delay: Duration) -> (String, MockUpstream) {
    let mock = MockUpstream {
        status: StatusCode::from_u16(status).unwrap(),
        body,
        delay,
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new().fallback(record).with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{}", addr), mock)
}
