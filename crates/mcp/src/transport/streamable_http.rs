use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

use super::shutdown_signal;
use crate::server::McpServer;

#[derive(Clone)]
struct HttpState {
    server: McpServer,
    json_response: bool,
}

pub async fn run(server: McpServer, addr: SocketAddr, json_response: bool) -> Result<()> {
    let app = router(server, json_response);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(json_response, "streamable-http transport listening on http://{}/mcp", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Stateless `POST /mcp`. Other methods on the path get 405.
pub fn router(server: McpServer, json_response: bool) -> Router {
    Router::new()
        .route("/mcp", post(handle_post))
        .layer(TraceLayer::new_for_http())
        .with_state(HttpState {
            server,
            json_response,
        })
}

async fn handle_post(State(state): State<HttpState>, body: String) -> Response {
    let Some(response) = state.server.handle_message(&body).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    if state.json_response {
        return Json(response).into_response();
    }

    match serde_json::to_string(&response) {
        Ok(text) => {
            let event = Event::default().event("message").data(text);
            Sse::new(tokio_stream::once(Ok::<_, Infallible>(event))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
