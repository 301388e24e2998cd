//! HTTP and SSE transports.
//!
//! - http: `POST {path}` carries one JSON-RPC message; the response is the
//!   JSON-RPC reply, or `202 Accepted` for notifications.
//! - sse: `GET /sse` opens an event stream that first announces an
//!   `endpoint`; messages are `POST`ed to `/messages?session_id=<id>` and
//!   replies are pushed on the stream as `message` events. A session is
//!   forgotten as soon as its stream is dropped.
//!
//! Both expose `GET /health`.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use super::protocol::{JsonRpcResponse, ToolServer};
use crate::Result;

/// Buffered replies per SSE session before senders wait.
const SSE_CHANNEL_CAPACITY: usize = 32;

/// Router for the plain HTTP transport.
pub fn http_router(server: Arc<ToolServer>, path: &str) -> Router {
    Router::new()
        .route(path, post(handle_post))
        .route("/health", get(health))
        .with_state(server)
}

/// Router for the SSE transport.
pub fn sse_router(server: Arc<ToolServer>) -> Router {
    let state = Arc::new(SseState {
        server,
        sessions: Mutex::new(HashMap::new()),
    });
    Router::new()
        .route("/sse", get(sse_connect))
        .route("/messages", post(sse_message))
        .route("/health", get(health))
        .with_state(state)
}

/// Serve `router` on `address` until Ctrl-C.
pub async fn serve(router: Router, address: &str) -> Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

async fn health() -> &'static str {
    "ok"
}

async fn handle_post(State(server): State<Arc<ToolServer>>, body: String) -> Response {
    reply(server.handle_message(&body).await)
}

fn reply(response: Option<JsonRpcResponse>) -> Response {
    match response {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

struct SseState {
    server: Arc<ToolServer>,
    sessions: Mutex<HashMap<String, mpsc::Sender<JsonRpcResponse>>>,
}

impl SseState {
    fn sender(&self, session_id: &str) -> Option<mpsc::Sender<JsonRpcResponse>> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.get(session_id).cloned()
    }

    fn register(&self, session_id: String, tx: mpsc::Sender<JsonRpcResponse>) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.insert(session_id, tx);
    }

    fn remove(&self, session_id: &str) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.remove(session_id);
    }
}

/// Unregisters a session when its event stream is dropped.
struct SessionGuard {
    state: Arc<SseState>,
    session_id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.state.remove(&self.session_id);
        debug!(session_id = %self.session_id, "sse session closed");
    }
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: String,
}

async fn sse_connect(
    State(state): State<Arc<SseState>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let session_id = uuid::Uuid::new_v4().simple().to_string();
    let (tx, rx) = mpsc::channel(SSE_CHANNEL_CAPACITY);
    state.register(session_id.clone(), tx);
    debug!(session_id = %session_id, "sse session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/messages?session_id={session_id}"));
    // The guard lives as long as the stream; a client disconnect drops both.
    let guard = SessionGuard {
        state: state.clone(),
        session_id,
    };
    let replies = ReceiverStream::new(rx).map(move |response| {
        let _guard = &guard;
        let data = serde_json::to_string(&response).unwrap_or_default();
        Ok(Event::default().event("message").data(data))
    });

    Sse::new(stream::once(async move { Ok(endpoint) }).chain(replies))
        .keep_alive(KeepAlive::default())
}

async fn sse_message(
    State(state): State<Arc<SseState>>,
    Query(query): Query<SessionQuery>,
    body: String,
) -> StatusCode {
    let Some(tx) = state.sender(&query.session_id) else {
        return StatusCode::NOT_FOUND;
    };

    // The reply travels on the event stream, so don't hold the POST open.
    let server = state.server.clone();
    tokio::spawn(async move {
        if let Some(response) = server.handle_message(&body).await {
            if tx.send(response).await.is_err() {
                debug!(session_id = %query.session_id, "reply dropped, session gone");
            }
        }
    });
    StatusCode::ACCEPTED
}
