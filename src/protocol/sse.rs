//! HTTP transport with server-sent events.
//!
//! A client opens `GET /sse` and receives an `endpoint` event naming the URL
//! to post requests to. Each JSON-RPC request posted there is dispatched and
//! its response is pushed back on the same event stream as a `message` event.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/sse` | Open a session event stream. |
//! | `POST` | `/message?sessionId=..` | Submit a JSON-RPC message for a session. |
//! | `GET`  | `/health` | Liveness check. |

use crate::error::Result;
use crate::protocol::handler::{Dispatcher, Handler};
use crate::protocol::transport::parse_message;
use crate::protocol::types::{JsonRpcResponse, Message};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use dashmap::DashMap;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const SSE_PATH: &str = "/sse";
pub const MESSAGE_PATH: &str = "/message";

/// Responses buffered per session before `POST /message` waits.
const SESSION_BUFFER: usize = 32;

type Sessions = Arc<DashMap<Uuid, mpsc::Sender<JsonRpcResponse>>>;

/// Shared state injected into every axum handler.
struct SseState<H: Handler> {
    dispatcher: Dispatcher<H>,
    sessions: Sessions,
}

impl<H: Handler> Clone for SseState<H> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Removes its session once the event stream is dropped.
struct SessionGuard {
    id: Uuid,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.sessions.remove(&self.id).is_some() {
            info!(session_id = %self.id, "SSE session closed");
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionQuery {
    session_id: Uuid,
}

/// MCP over HTTP + SSE.
pub struct SseServer<H: Handler> {
    state: SseState<H>,
}

impl<H: Handler + 'static> SseServer<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            state: SseState {
                dispatcher: Dispatcher::new(handler),
                sessions: Arc::new(DashMap::new()),
            },
        }
    }

    pub fn session_count(&self) -> usize {
        self.state.sessions.len()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(SSE_PATH, get(open_stream::<H>))
            .route(MESSAGE_PATH, post(post_message::<H>))
            .route("/health", get(health))
            .with_state(self.state.clone())
    }

    /// Bind `addr` and serve until `shutdown` resolves. Open streams are
    /// closed on shutdown so the graceful drain can finish.
    pub async fn serve<F>(self, addr: &str, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "SSE transport listening");

        let sessions = Arc::clone(&self.state.sessions);
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("Closing {} SSE session(s)", sessions.len());
                sessions.clear();
            })
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// `GET /sse` - open a session stream.
async fn open_stream<H: Handler + 'static>(
    State(state): State<SseState<H>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>> {
    let session_id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel(SESSION_BUFFER);
    state.sessions.insert(session_id, tx);
    info!(%session_id, "SSE session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{MESSAGE_PATH}?sessionId={session_id}"));
    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions,
    };

    let messages = ReceiverStream::new(rx).map(move |response| {
        let _session = &guard;
        Event::default().event("message").json_data(response)
    });

    let announce = stream::iter([Ok::<_, axum::Error>(endpoint)]);
    Sse::new(announce.chain(messages)).keep_alive(KeepAlive::default())
}

/// `POST /message` - dispatch one JSON-RPC message for a session.
async fn post_message<H: Handler + 'static>(
    State(state): State<SseState<H>>,
    Query(query): Query<SessionQuery>,
    body: String,
) -> Response {
    let Some(sender) = state
        .sessions
        .get(&query.session_id)
        .map(|entry| entry.value().clone())
    else {
        warn!(session_id = %query.session_id, "Message for unknown session");
        return (StatusCode::NOT_FOUND, "Unknown session").into_response();
    };

    let request = match parse_message(&body) {
        Ok(Message::Request(request)) => request,
        Ok(Message::Response(response)) => {
            warn!("Unexpected response received: {:?}", response.id);
            return StatusCode::ACCEPTED.into_response();
        }
        Err(e) => {
            debug!("Rejecting message: {}", e);
            return (StatusCode::BAD_REQUEST, "Invalid JSON-RPC message").into_response();
        }
    };

    let is_notification = request.is_notification();
    let response = state.dispatcher.dispatch(request).await;

    if !is_notification && sender.send(response).await.is_err() {
        state.sessions.remove(&query.session_id);
        return (StatusCode::GONE, "Session closed").into_response();
    }

    StatusCode::ACCEPTED.into_response()
}

/// `GET /health` - liveness probe.
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
