//! Request and response bodies for the status and command operations

use serde::{Deserialize, Serialize};

/// Result of a status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Whether the server answered
    pub online: bool,
    /// Raw `list` output when online
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<String>,
    /// Failure reason when offline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    /// Server answered `list`
    pub fn online(players: impl Into<String>) -> Self {
        Self {
            online: true,
            players: Some(players.into()),
            error: None,
        }
    }

    /// Server unreachable or command failed
    pub fn offline(error: impl Into<String>) -> Self {
        Self {
            online: false,
            players: None,
            error: Some(error.into()),
        }
    }
}

/// Body of a command request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Command text, sent verbatim
    pub command: String,
}

/// Result of running a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Whether a response was received
    pub success: bool,
    /// Response payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Failure reason otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutcome {
    /// Command answered
    pub fn success(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: Some(response.into()),
            error: None,
        }
    }

    /// Command failed before a response arrived
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }
}
