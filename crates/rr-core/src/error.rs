//! Core error types for rcon-relay

use rr_protocol::ProtocolError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that stop the relay from starting or serving
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a connection attempt or an established connection failed.
///
/// All of these are retried by the reconnect loop; callers only ever see
/// them through [`CommandError`].
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// TCP connect failed (DNS, refused, timeout)
    #[error("Failed to connect to {address}: {reason}")]
    Connect { address: String, reason: String },

    /// Peer answered the auth packet with the failure sentinel
    #[error("Authentication rejected by server")]
    AuthFailed,

    /// Peer did not answer the auth packet in time
    #[error("Authentication timed out after {0:?}")]
    AuthTimeout(Duration),

    /// Peer sent bytes that do not form a valid frame
    #[error("Corrupt frame: {0}")]
    CorruptFrame(#[source] ProtocolError),

    /// Peer closed the stream
    #[error("Stream closed: {0}")]
    StreamClosed(String),

    /// Writing to the stream failed
    #[error("Write failed: {0}")]
    Write(String),
}

impl ConnectionError {
    /// Whether the peer explicitly rejected the credential
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, ConnectionError::AuthFailed)
    }
}

/// Errors surfaced to a caller of `send_command`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No authenticated connection right now
    #[error("Not connected to RCON server")]
    NotConnected,

    /// Connection dropped while the request was in flight
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Writing the command packet failed
    #[error("Failed to send command: {0}")]
    Write(String),

    /// No response within the configured request timeout
    #[error("Timed out after {0:?} waiting for response")]
    Timeout(Duration),

    /// Pending table is full
    #[error("Too many pending commands (max {max})")]
    TooManyPending { max: usize },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
