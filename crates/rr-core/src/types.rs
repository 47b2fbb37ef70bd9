//! Common types used throughout rcon-relay

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of the connection to the RCON server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No connection and no attempt in progress
    Disconnected,
    /// TCP connect in progress
    Connecting,
    /// Connected, waiting for the auth response
    Authenticating,
    /// Authenticated and accepting commands
    Ready,
    /// Waiting out the backoff before the next attempt
    Reconnecting,
    /// Shutting down
    Closing,
}

impl ConnectionState {
    /// Whether commands can be sent in this state
    pub fn is_ready(&self) -> bool {
        matches!(self, ConnectionState::Ready)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Authenticating => "authenticating",
            ConnectionState::Ready => "ready",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::Closing => "closing",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_ready_is_ready() {
        assert!(ConnectionState::Ready.is_ready());
        for state in [
            ConnectionState::Disconnected,
            ConnectionState::Connecting,
            ConnectionState::Authenticating,
            ConnectionState::Reconnecting,
            ConnectionState::Closing,
        ] {
            assert!(!state.is_ready(), "{} should not be ready", state);
        }
    }

    #[test]
    fn test_state_serializes_snake_case() {
        let json = serde_json::to_string(&ConnectionState::Reconnecting).unwrap();
        assert_eq!(json, r#""reconnecting""#);
    }
}
