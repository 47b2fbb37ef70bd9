//! Core trait definitions

use async_trait::async_trait;

use crate::api::{CommandOutcome, StatusReport};
use crate::error::CommandError;

/// Something that can run RCON commands on behalf of the HTTP layer
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Non-blocking snapshot: is an authenticated connection available?
    fn is_ready(&self) -> bool;

    /// Send a command and wait for its response payload
    async fn send_command(&self, command: &str) -> Result<String, CommandError>;

    /// Report whether the server is reachable, with the `list` output when it is.
    ///
    /// Never connects on the caller's behalf: when not ready it reports
    /// offline immediately.
    async fn get_status(&self) -> StatusReport {
        if !self.is_ready() {
            return StatusReport::offline(CommandError::NotConnected.to_string());
        }
        match self.send_command("list").await {
            Ok(players) => StatusReport::online(players),
            Err(e) => StatusReport::offline(e.to_string()),
        }
    }

    /// Run an arbitrary command
    async fn run_command(&self, command: &str) -> CommandOutcome {
        match self.send_command(command).await {
            Ok(response) => CommandOutcome::success(response),
            Err(e) => CommandOutcome::failure(e.to_string()),
        }
    }
}
