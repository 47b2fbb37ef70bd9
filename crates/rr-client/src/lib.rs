//! rr-client: RCON client session for rcon-relay
//!
//! [`SessionManager`] owns a single connection to a game server's RCON
//! endpoint. It authenticates, multiplexes concurrent commands over the
//! connection by request id, and keeps reconnecting in the background after
//! any failure so callers never block on a dead server.

pub mod manager;
pub mod session;
pub mod transport;

pub use manager::{Health, SessionManager};
pub use session::Session;
pub use transport::{Connection, FixedBackoff, PacketStream, PacketWriter, Transport};
