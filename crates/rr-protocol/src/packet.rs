//! Packet types for the RCON protocol
//!
//! # Message Flow
//!
//! 1. Client connects and sends `Auth` carrying the shared password
//! 2. Peer answers with `AuthResponse`, echoing the request id on success or
//!    answering with id `-1` on rejection
//! 3. Client sends `Command` packets, each with a fresh request id
//! 4. Peer answers each with a `CommandResponse` carrying the same id
//!
//! # Type codes
//!
//! The wire reuses code `2` for both `Command` (client to peer) and
//! `AuthResponse` (peer to client), so a type code can only be interpreted
//! once the decoding [`Role`] is known.

use std::borrow::Cow;

use bytes::Bytes;

use crate::request_id::RequestId;

/// Which end of the connection is decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Decodes packets sent by the peer (`CommandResponse`, `AuthResponse`)
    Client,
    /// Decodes packets sent by a client (`Command`, `Auth`)
    Server,
}

/// Packet type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// Command to execute (`SERVERDATA_EXECCOMMAND`)
    Command,
    /// Output of a command (`SERVERDATA_RESPONSE_VALUE`)
    CommandResponse,
    /// Login with the shared password (`SERVERDATA_AUTH`)
    Auth,
    /// Result of a login attempt (`SERVERDATA_AUTH_RESPONSE`)
    AuthResponse,
}

impl PacketType {
    /// Wire code for this type
    pub fn as_i32(&self) -> i32 {
        match self {
            PacketType::CommandResponse => 0,
            PacketType::Command => 2,
            PacketType::AuthResponse => 2,
            PacketType::Auth => 3,
        }
    }

    /// Interpret a wire code as seen by `role`
    pub fn from_i32(value: i32, role: Role) -> Option<Self> {
        match (role, value) {
            (Role::Client, 0) => Some(Self::CommandResponse),
            (Role::Client, 2) => Some(Self::AuthResponse),
            (Role::Server, 2) => Some(Self::Command),
            (Role::Server, 3) => Some(Self::Auth),
            _ => None,
        }
    }
}

/// A single decoded RCON packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Correlation id
    pub request_id: RequestId,
    /// Packet type
    pub packet_type: PacketType,
    /// Payload without the trailing null terminators
    pub body: Bytes,
}

impl Packet {
    /// Create a new packet
    pub fn new(request_id: RequestId, packet_type: PacketType, body: impl Into<Bytes>) -> Self {
        Self {
            request_id,
            packet_type,
            body: body.into(),
        }
    }

    /// Login packet carrying the shared password
    pub fn auth(request_id: RequestId, password: &str) -> Self {
        Self::new(
            request_id,
            PacketType::Auth,
            Bytes::copy_from_slice(password.as_bytes()),
        )
    }

    /// Command packet
    pub fn command(request_id: RequestId, command: &str) -> Self {
        Self::new(
            request_id,
            PacketType::Command,
            Bytes::copy_from_slice(command.as_bytes()),
        )
    }

    /// Payload as text, replacing invalid UTF-8 sequences
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Whether this is an auth response rejecting the password
    pub fn is_auth_rejection(&self) -> bool {
        self.packet_type == PacketType::AuthResponse && self.request_id == RequestId::AUTH_FAILED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes_by_role() {
        for (ty, role) in [
            (PacketType::CommandResponse, Role::Client),
            (PacketType::AuthResponse, Role::Client),
            (PacketType::Command, Role::Server),
            (PacketType::Auth, Role::Server),
        ] {
            assert_eq!(PacketType::from_i32(ty.as_i32(), role), Some(ty));
        }
    }

    #[test]
    fn test_shared_code_depends_on_role() {
        assert_eq!(PacketType::from_i32(2, Role::Client), Some(PacketType::AuthResponse));
        assert_eq!(PacketType::from_i32(2, Role::Server), Some(PacketType::Command));
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(PacketType::from_i32(3, Role::Client), None);
        assert_eq!(PacketType::from_i32(0, Role::Server), None);
        assert_eq!(PacketType::from_i32(99, Role::Client), None);
    }

    #[test]
    fn test_auth_rejection() {
        let rejected = Packet::new(RequestId::AUTH_FAILED, PacketType::AuthResponse, Bytes::new());
        assert!(rejected.is_auth_rejection());

        let accepted = Packet::new(RequestId::new(1), PacketType::AuthResponse, Bytes::new());
        assert!(!accepted.is_auth_rejection());
    }

    #[test]
    fn test_body_text_lossy() {
        let packet = Packet::new(
            RequestId::new(1),
            PacketType::CommandResponse,
            Bytes::from_static(b"ok \xff"),
        );
        assert_eq!(packet.body_text(), "ok \u{fffd}");
    }
}
