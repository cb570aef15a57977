//! Test utilities for axe-core
//!
//! In-process axum servers standing in for the analysis service and for an
//! OpenAI-compatible LLM server. Both record the JSON bodies they receive.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tokio::sync::oneshot;

/// Canned reply for [`MockAnalysisServer`]
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: Value,
}

impl MockReply {
    pub fn success(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// The `bought shoes` analysis: reason "X", trigger "Y", one A/B row
    pub fn sample_success() -> Self {
        Self::success(serde_json::json!({
            "underlying_reason": "X",
            "behavioral_triggers": ["Y"],
            "recommendations": [{"action": "A", "why": "B"}],
            "spending_reason": "bought shoes",
            "actual_spent": 50,
            "category": "general"
        }))
    }

    pub fn rejection(status: u16, detail: Option<&str>) -> Self {
        let body = match detail {
            Some(detail) => serde_json::json!({ "detail": detail }),
            None => serde_json::json!({}),
        };
        Self { status, body }
    }
}

/// Shared between a mock server and its handle
struct Recorder<R> {
    replies: Mutex<R>,
    requests: Mutex<Vec<Value>>,
}

impl<R> Recorder<R> {
    fn new(replies: R) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn record(&self, body: Value) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(body);
        }
    }

    fn requests(&self) -> Vec<Value> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

/// Bind an app on an ephemeral port and serve it until the sender fires
async fn spawn(app: Router) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

/// Mock `/api/analyze` service
///
/// Replies are consumed in order; the last one repeats once the queue is
/// down to a single entry.
pub struct MockAnalysisServer {
    addr: SocketAddr,
    recorder: Arc<Recorder<VecDeque<MockReply>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAnalysisServer {
    /// Start a server that always gives the same reply
    pub async fn start(reply: MockReply) -> Self {
        Self::start_with(vec![reply]).await
    }

    /// Start a server that gives the replies in order
    pub async fn start_with(replies: Vec<MockReply>) -> Self {
        let recorder = Recorder::new(VecDeque::from(replies));
        let app = Router::new()
            .route("/api/analyze", post(handle_analyze))
            .with_state(recorder.clone());

        let (addr, shutdown_tx) = spawn(app).await;
        Self {
            addr,
            recorder,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.recorder.requests()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAnalysisServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_analyze(
    State(recorder): State<Arc<Recorder<VecDeque<MockReply>>>>,
    Json(body): Json<Value>,
) -> Response {
    recorder.record(body);

    let reply = {
        let mut replies = recorder.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        }
    };

    match reply {
        Some(reply) => {
            let status =
                StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(reply.body)).into_response()
        }
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Mock OpenAI-compatible chat server
///
/// Answers `/v1/chat/completions` with the queued contents in order (the last
/// one repeats) and `/v1/models` with a single model.
pub struct MockChatServer {
    addr: SocketAddr,
    recorder: Arc<Recorder<VecDeque<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockChatServer {
    pub async fn start(contents: Vec<String>) -> Self {
        let recorder = Recorder::new(VecDeque::from(contents));
        let app = Router::new()
            .route("/v1/chat/completions", post(handle_chat))
            .route("/v1/models", get(handle_models))
            .with_state(recorder.clone());

        let (addr, shutdown_tx) = spawn(app).await;
        Self {
            addr,
            recorder,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Chat completion request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.recorder.requests()
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_chat(
    State(recorder): State<Arc<Recorder<VecDeque<String>>>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let model = body["model"].as_str().unwrap_or("mock").to_string();
    recorder.record(body);

    let content = {
        let mut contents = recorder.replies.lock().unwrap();
        if contents.len() > 1 {
            contents.pop_front()
        } else {
            contents.front().cloned()
        }
    }
    .unwrap_or_default();

    Json(serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
}

async fn handle_models() -> Json<Value> {
    Json(serde_json::json!({
        "object": "list",
        "data": [{"id": "mock-model", "object": "model"}]
    }))
}
