use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::shutdown_signal;
use crate::server::McpServer;

const MESSAGES_PATH: &str = "/messages/";

type Sessions = Arc<Mutex<HashMap<String, mpsc::Sender<String>>>>;

#[derive(Clone)]
struct SseState {
    server: McpServer,
    sessions: Sessions,
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: String,
}

/// Removes its session from the table when the event stream is dropped.
struct SessionGuard {
    id: String,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
        tracing::debug!(session_id = %self.id, "sse session closed");
    }
}

pub async fn run(server: McpServer, addr: SocketAddr) -> Result<()> {
    let app = router(server);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("sse transport listening on http://{}/sse", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// `GET /sse` opens a session stream; `POST /messages/?session_id=..` feeds it.
pub fn router(server: McpServer) -> Router {
    let state = SseState {
        server,
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

    Router::new()
        .route("/sse", get(open_stream))
        .route(MESSAGES_PATH, post(post_message))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn open_stream(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4().simple().to_string();
    let (tx, rx) = mpsc::channel::<String>(32);
    state
        .sessions
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(session_id.clone(), tx);
    tracing::debug!(%session_id, "sse session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?session_id={}", MESSAGES_PATH, session_id));

    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };
    let messages = ReceiverStream::new(rx).map(move |message| {
        let _session = &guard;
        Ok::<_, Infallible>(Event::default().event("message").data(message))
    });

    let stream = tokio_stream::once(Ok::<_, Infallible>(endpoint)).chain(messages);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn post_message(
    State(state): State<SseState>,
    Query(query): Query<SessionQuery>,
    body: String,
) -> StatusCode {
    let sender = state
        .sessions
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&query.session_id)
        .cloned();

    let Some(sender) = sender else {
        tracing::warn!(session_id = %query.session_id, "message for unknown session");
        return StatusCode::NOT_FOUND;
    };

    tokio::spawn(async move {
        if let Some(response) = state.server.handle_request(&body).await {
            if sender.send(response).await.is_err() {
                tracing::debug!(session_id = %query.session_id, "session closed before response");
            }
        }
    });

    StatusCode::ACCEPTED
}
