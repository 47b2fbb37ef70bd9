//! rcon-relay: HTTP front end for the RCON session manager
//!
//! Exposes the status and command operations as a small JSON API and
//! serves the static web UI.

pub mod http;

pub use http::{router, serve};

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use rr_client::SessionManager;
use rr_core::config::RelayConfig;
use rr_core::RelayError;

/// Run the relay until `cancel` fires or the HTTP server fails.
///
/// The config is validated and the HTTP address bound before the RCON
/// session manager starts, so a bad setup fails without connecting. Once
/// running, the manager connects in the background while HTTP already
/// answers (status reports offline until Ready).
pub async fn run(config: RelayConfig, cancel: CancellationToken) -> Result<(), RelayError> {
    config.validate()?;

    let listener = TcpListener::bind(&config.http.bind_address)
        .await
        .map_err(|e| {
            tracing::error!("Failed to bind {}: {}", config.http.bind_address, e);
            e
        })?;

    let manager = SessionManager::new(config.rcon.clone());
    let manager_task = manager.spawn(cancel.clone());

    let app = router(Arc::new(manager), &config.http.public_dir);
    let served = serve(listener, app, cancel.clone()).await;

    // Stop the RCON loop whichever way the HTTP server ended
    cancel.cancel();
    if let Err(e) = manager_task.await {
        tracing::warn!("RCON session task ended abnormally: {}", e);
    }

    served
}
