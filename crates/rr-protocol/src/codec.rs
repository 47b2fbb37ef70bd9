//! Tokio codec for framed RCON packets

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::frame::{decode_frame, encode_frame, Decoded, HEADER_SIZE};
use crate::packet::{Packet, Role};

/// Codec for encoding/decoding RCON packets on a byte stream
#[derive(Debug, Clone, Copy)]
pub struct PacketCodec {
    /// Side of the connection this codec decodes for
    role: Role,
}

impl PacketCodec {
    /// Create a codec for the given role
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    /// Codec used by the relay when talking to a game server
    pub fn client() -> Self {
        Self::new(Role::Client)
    }

    /// Codec for the accepting side (used by test peers)
    pub fn server() -> Self {
        Self::new(Role::Server)
    }

    /// Role this codec decodes for
    pub fn role(&self) -> Role {
        self.role
    }
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match decode_frame(src, self.role) {
            Decoded::Packet { packet, consumed } => {
                src.advance(consumed);
                Ok(Some(packet))
            }
            Decoded::Incomplete => {
                src.reserve(HEADER_SIZE);
                Ok(None)
            }
            Decoded::Corrupt(err) => Err(err),
        }
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, packet: Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_frame(&packet, dst)
    }
}
