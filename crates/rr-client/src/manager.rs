//! Reconnecting session manager
//!
//! Owns the background loop that keeps a [`Session`] Ready: connect,
//! authenticate, pump inbound packets, and on any failure wait a fixed
//! interval and start over. Callers interact through a cheap cloneable
//! handle; while no session is Ready they get `NotConnected` immediately.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use rr_core::config::RconConfig;
use rr_core::{CommandError, CommandExecutor, ConnectionError, ConnectionState};

use crate::session::Session;
use crate::transport::{FixedBackoff, Transport};

/// Snapshot of connection health
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Health {
    /// Current state
    pub state: ConnectionState,
    /// Most recent failure, cleared once Ready
    pub last_error: Option<String>,
}

struct Shared {
    config: RconConfig,
    health: watch::Sender<Health>,
    session: RwLock<Option<Arc<Session>>>,
}

/// Handle to the single RCON connection
#[derive(Clone)]
pub struct SessionManager {
    shared: Arc<Shared>,
}

impl SessionManager {
    /// Create a manager; nothing connects until [`SessionManager::spawn`]
    pub fn new(config: RconConfig) -> Self {
        let (health, _) = watch::channel(Health {
            state: ConnectionState::Disconnected,
            last_error: None,
        });
        Self {
            shared: Arc::new(Shared {
                config,
                health,
                session: RwLock::new(None),
            }),
        }
    }

    /// Start the connect/reconnect loop in the background
    pub fn spawn(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move { manager.run(cancel).await })
    }

    /// Current state (non-blocking)
    pub fn state(&self) -> ConnectionState {
        self.shared.health.borrow().state
    }

    /// Whether commands can be sent right now (non-blocking)
    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// Most recent failure reason, if any
    pub fn last_error(&self) -> Option<String> {
        self.shared.health.borrow().last_error.clone()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<Health> {
        self.shared.health.subscribe()
    }

    /// Send a command over the current session.
    ///
    /// Fails fast with `NotConnected` unless Ready; never queues.
    pub async fn send_command(&self, command: &str) -> Result<String, CommandError> {
        if !self.is_ready() {
            return Err(CommandError::NotConnected);
        }
        let session = self
            .shared
            .session
            .read()
            .await
            .clone()
            .ok_or(CommandError::NotConnected)?;
        session.send_command(command).await
    }

    /// Commands currently awaiting a response
    pub async fn pending_count(&self) -> usize {
        match self.shared.session.read().await.as_ref() {
            Some(session) => session.pending_count(),
            None => 0,
        }
    }

    /// Run the reconnect loop until `cancel` fires
    pub async fn run(&self, cancel: CancellationToken) {
        let config = &self.shared.config;
        let mut backoff = FixedBackoff::new(config.reconnect_interval);

        tracing::info!("Starting RCON session manager for {}", config.address());

        loop {
            let failure = tokio::select! {
                _ = cancel.cancelled() => break,
                failure = self.run_connection(&mut backoff) => failure,
            };

            if failure.is_auth_rejection() && !config.retry_on_auth_failure {
                tracing::error!(
                    "RCON password rejected by {}; not retrying",
                    config.address()
                );
                self.set_health(ConnectionState::Disconnected, Some(failure.to_string()));
                return;
            }

            let delay = backoff.next_delay();
            if failure.is_auth_rejection() {
                tracing::error!(
                    "RCON password rejected by {}. Retrying in {:?}",
                    config.address(),
                    delay
                );
            } else {
                tracing::warn!(
                    "RCON connection failed: {}. Retrying in {:?} (attempt {})",
                    failure,
                    delay,
                    backoff.attempts()
                );
            }
            self.set_health(ConnectionState::Reconnecting, Some(failure.to_string()));

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.shutdown().await;
    }

    /// One connection lifetime: connect, authenticate, read until it ends.
    ///
    /// Always returns the reason the connection is gone.
    async fn run_connection(&self, backoff: &mut FixedBackoff) -> ConnectionError {
        let config = &self.shared.config;
        let address = config.address();

        self.set_state(ConnectionState::Connecting);
        let connection = match Transport::open(&address, config.connect_timeout).await {
            Ok(connection) => connection,
            Err(e) => return e,
        };
        let (writer, mut packets) = connection.split();
        let session = Arc::new(Session::new(
            writer,
            config.max_pending,
            config.request_timeout(),
        ));

        self.set_state(ConnectionState::Authenticating);
        if let Err(e) = session
            .authenticate(&mut packets, &config.password, config.auth_timeout)
            .await
        {
            session.close().await;
            return e;
        }

        *self.shared.session.write().await = Some(Arc::clone(&session));
        self.set_health(ConnectionState::Ready, None);
        backoff.reset();
        tracing::info!("Connected to RCON server at {}", address);

        let failure = loop {
            match packets.next_packet().await {
                Ok(packet) => session.dispatch(packet),
                Err(e) => break e,
            }
        };

        self.set_health(ConnectionState::Reconnecting, Some(failure.to_string()));
        self.retire_session(&failure.to_string()).await;
        failure
    }

    /// Unpublish the current session and fail whatever it had in flight
    async fn retire_session(&self, reason: &str) {
        let session = self.shared.session.write().await.take();
        if let Some(session) = session {
            let failed = session.fail_all(reason);
            if failed > 0 {
                tracing::warn!("Failed {} in-flight RCON command(s): {}", failed, reason);
            }
            session.close().await;
        }
    }

    async fn shutdown(&self) {
        tracing::info!("Stopping RCON session manager");
        self.set_state(ConnectionState::Closing);
        self.retire_session("relay shutting down").await;
        self.set_state(ConnectionState::Disconnected);
    }

    fn set_state(&self, state: ConnectionState) {
        self.shared.health.send_modify(|health| health.state = state);
    }

    fn set_health(&self, state: ConnectionState, last_error: Option<String>) {
        self.shared.health.send_modify(|health| {
            health.state = state;
            health.last_error = last_error;
        });
    }
}

#[async_trait]
impl CommandExecutor for SessionManager {
    fn is_ready(&self) -> bool {
        SessionManager::is_ready(self)
    }

    async fn send_command(&self, command: &str) -> Result<String, CommandError> {
        SessionManager::send_command(self, command).await
    }
}
