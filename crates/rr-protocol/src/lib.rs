//! rr-protocol: Source RCON wire format
//!
//! This crate defines the binary packet format spoken between the relay and
//! a remote game server's RCON endpoint. It has no I/O of its own: the frame
//! decoder is a pure function over a byte buffer, and [`PacketCodec`] adapts
//! it to `tokio_util` framed streams.

pub mod codec;
pub mod error;
pub mod frame;
pub mod packet;
pub mod request_id;

#[cfg(test)]
mod property_tests;

pub use codec::PacketCodec;
pub use error::ProtocolError;
pub use frame::{decode_frame, encode_frame, Decoded, HEADER_SIZE, MAX_PAYLOAD_SIZE};
pub use packet::{Packet, PacketType, Role};
pub use request_id::RequestId;
