//! HTTP API and static file serving

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;

use rr_core::{CommandExecutor, CommandOutcome, CommandRequest, RelayError, StatusReport};

/// Shared handler state
#[derive(Clone)]
struct AppState {
    executor: Arc<dyn CommandExecutor>,
}

/// Build the router: `/api/*` routes plus static files from `public_dir`
pub fn router(executor: Arc<dyn CommandExecutor>, public_dir: &Path) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/command", post(command))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(AppState { executor })
}

/// Serve `app` on `listener` until `cancel` fires
pub async fn serve(
    listener: TcpListener,
    app: Router,
    cancel: CancellationToken,
) -> Result<(), RelayError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Web UI listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down");
        })
        .await?;

    Ok(())
}

async fn status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(state.executor.get_status().await)
}

async fn command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> Json<CommandOutcome> {
    tracing::debug!("Relaying command: {}", request.command);
    let outcome = state.executor.run_command(&request.command).await;
    if let Some(error) = &outcome.error {
        tracing::warn!("Command failed: {}", error);
    }
    Json(outcome)
}
