//! rr-core: Core abstractions and configuration for rcon-relay
//!
//! This crate provides the error taxonomy, configuration structures and the
//! request/response types shared by the RCON client and the HTTP front end.

pub mod api;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use api::{CommandOutcome, CommandRequest, StatusReport};
pub use error::{CommandError, ConfigError, ConnectionError, RelayError};
pub use traits::CommandExecutor;
pub use types::ConnectionState;
