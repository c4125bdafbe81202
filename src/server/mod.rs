//! HTTP and WebSocket surface.
//!
//! Thin plumbing around the monitoring core: a root identity endpoint, a
//! health check, and the `/ws/metrics` stream pushing one JSON frame per
//! sampling cycle to each connected client.

use std::sync::Arc;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;

use crate::core::monitor::{MetricsFrame, MonitorHandle};
use crate::error::Result;

/// Shared server state.
struct AppState {
    monitor: MonitorHandle,
}

async fn handle_index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "app": "SysPulse",
        "tagline": "The Real-Time Heartbeat of Your System",
        "status": "running"
    }))
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn handle_ws_metrics(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let frames = state.monitor.subscribe();
    ws.on_upgrade(move |socket| stream_frames(socket, frames))
}

/// Forward frames to one client until it disconnects or a send fails.
///
/// Errors here terminate only this connection; the sampling task and other
/// clients are unaffected.
async fn stream_frames(
    mut socket: WebSocket,
    mut frames: broadcast::Receiver<Arc<MetricsFrame>>,
) {
    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Ok(frame) => {
                    let payload = match serde_json::to_string(frame.as_ref()) {
                        Ok(payload) => payload,
                        Err(e) => {
                            log::error!("Failed to serialize metrics frame: {}", e);
                            break;
                        }
                    };
                    if let Err(e) = socket.send(Message::Text(payload.into())).await {
                        log::debug!("Client send failed: {}", e);
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Slow client: drop the missed frames and resume with
                    // current ones.
                    log::warn!("Metrics client lagging, skipped {} frames", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = socket.recv() => match msg {
                Some(Ok(Message::Close(_))) | None => {
                    log::info!("Client disconnected");
                    break;
                }
                // No client-to-server payload is expected; ignore anything else.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::debug!("WebSocket error: {}", e);
                    break;
                }
            },
        }
    }
}

/// Build the axum router.
pub fn build_router(monitor: MonitorHandle) -> Router {
    let state = Arc::new(AppState { monitor });

    Router::new()
        .route("/", get(handle_index))
        .route("/api/health", get(handle_health))
        .route("/ws/metrics", get(handle_ws_metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the HTTP server until ctrl-c, then stop the sampling task.
pub async fn run_server(monitor: MonitorHandle, host: &str, port: u16) -> Result<()> {
    let app = build_router(monitor.clone());
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    monitor.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
