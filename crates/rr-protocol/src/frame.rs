//! Frame encoding/decoding
//!
//! Every packet travels as one frame, all integers little-endian:
//! - length: 4 bytes (i32, counts every byte after this field)
//! - request_id: 4 bytes (i32)
//! - type: 4 bytes (i32)
//! - payload: `length - 10` bytes
//! - terminator: 2 null bytes

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::ProtocolError;
use crate::packet::{Packet, PacketType, Role};
use crate::request_id::RequestId;

/// Size of the length, request id and type fields together
pub const HEADER_SIZE: usize = 12;

/// Size of the length prefix
const LENGTH_FIELD_SIZE: usize = 4;

/// Two null bytes close every frame
const TERMINATOR_SIZE: usize = 2;

/// Smallest valid value of the length field (empty payload)
const MIN_FRAME_LENGTH: usize = HEADER_SIZE - LENGTH_FIELD_SIZE + TERMINATOR_SIZE;

/// Maximum payload size accepted in either direction
pub const MAX_PAYLOAD_SIZE: usize = 4096;

/// Largest valid value of the length field
const MAX_FRAME_LENGTH: usize = MAX_PAYLOAD_SIZE + MIN_FRAME_LENGTH;

/// Outcome of inspecting a buffer for one frame
#[derive(Debug)]
pub enum Decoded {
    /// A full frame was present at the start of the buffer
    Packet {
        /// The decoded packet
        packet: Packet,
        /// Number of bytes the frame occupied
        consumed: usize,
    },
    /// The buffer holds only a prefix of a frame; nothing was consumed
    Incomplete,
    /// The bytes cannot be a valid frame; the stream is out of sync
    Corrupt(ProtocolError),
}

/// Encode a packet into a byte buffer
pub fn encode_frame(packet: &Packet, dst: &mut BytesMut) -> Result<(), ProtocolError> {
    let payload_len = packet.body.len();
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(ProtocolError::PayloadTooLarge {
            size: payload_len,
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let length = payload_len + MIN_FRAME_LENGTH;
    dst.reserve(LENGTH_FIELD_SIZE + length);
    dst.put_i32_le(length as i32);
    dst.put_i32_le(packet.request_id.as_i32());
    dst.put_i32_le(packet.packet_type.as_i32());
    dst.extend_from_slice(&packet.body);
    dst.put_u16(0);

    Ok(())
}

/// Decode one frame from the start of `src`, interpreting type codes as
/// `role` sees them.
///
/// Never mutates `src`. On [`Decoded::Packet`] the caller advances its
/// buffer by `consumed` bytes.
pub fn decode_frame(src: &[u8], role: Role) -> Decoded {
    if src.len() < LENGTH_FIELD_SIZE {
        return Decoded::Incomplete;
    }

    let mut cursor = src;
    let length = cursor.get_i32_le();
    let frame_len = match usize::try_from(length) {
        Ok(len) if (MIN_FRAME_LENGTH..=MAX_FRAME_LENGTH).contains(&len) => len,
        _ => return Decoded::Corrupt(ProtocolError::InvalidLength(length)),
    };

    let total = LENGTH_FIELD_SIZE + frame_len;
    if src.len() < total {
        return Decoded::Incomplete;
    }

    let request_id = RequestId::new(cursor.get_i32_le());
    let type_code = cursor.get_i32_le();
    let Some(packet_type) = PacketType::from_i32(type_code, role) else {
        return Decoded::Corrupt(ProtocolError::UnknownPacketType(type_code));
    };

    if src[total - TERMINATOR_SIZE..total] != [0, 0] {
        return Decoded::Corrupt(ProtocolError::MissingTerminator);
    }

    let body = Bytes::copy_from_slice(&src[HEADER_SIZE..total - TERMINATOR_SIZE]);

    Decoded::Packet {
        packet: Packet::new(request_id, packet_type, body),
        consumed: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(packet: &Packet) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_frame(packet, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_wire_layout() {
        let packet = Packet::auth(RequestId::new(1), "pw");
        let buf = encode(&packet);

        assert_eq!(
            &buf[..],
            &[12, 0, 0, 0, 1, 0, 0, 0, 3, 0, 0, 0, b'p', b'w', 0, 0][..]
        );
    }

    #[test]
    fn test_roundtrip_each_direction() {
        let cases = [
            (Packet::command(RequestId::new(5), "list"), Role::Server),
            (Packet::auth(RequestId::new(6), "secret"), Role::Server),
            (
                Packet::new(RequestId::new(5), PacketType::CommandResponse, "There are 0 players"),
                Role::Client,
            ),
            (
                Packet::new(RequestId::new(6), PacketType::AuthResponse, Bytes::new()),
                Role::Client,
            ),
        ];

        for (packet, role) in cases {
            let buf = encode(&packet);
            match decode_frame(&buf, role) {
                Decoded::Packet {
                    packet: decoded,
                    consumed,
                } => {
                    assert_eq!(decoded, packet);
                    assert_eq!(consumed, buf.len());
                }
                other => panic!("Expected packet, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_every_prefix_is_incomplete() {
        let packet = Packet::new(
            RequestId::new(9),
            PacketType::CommandResponse,
            "There are 2 of a max 20 players online: Alice, Bob",
        );
        let buf = encode(&packet);

        for end in 0..buf.len() {
            assert!(
                matches!(decode_frame(&buf[..end], Role::Client), Decoded::Incomplete),
                "prefix of {} bytes should be incomplete",
                end
            );
        }

        match decode_frame(&buf, Role::Client) {
            Decoded::Packet { packet: decoded, .. } => assert_eq!(decoded, packet),
            other => panic!("Expected packet, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_bytes_not_consumed() {
        let first = Packet::command(RequestId::new(1), "a");
        let second = Packet::command(RequestId::new(2), "b");
        let mut buf = encode(&first);
        buf.extend_from_slice(&encode(&second)[..3]);

        match decode_frame(&buf, Role::Server) {
            Decoded::Packet { packet, consumed } => {
                assert_eq!(packet, first);
                assert_eq!(consumed, buf.len() - 3);
            }
            other => panic!("Expected packet, got {:?}", other),
        }
    }

    #[test]
    fn test_length_too_small_is_corrupt() {
        let buf = [9, 0, 0, 0, 1, 0, 0, 0];
        assert!(matches!(
            decode_frame(&buf, Role::Client),
            Decoded::Corrupt(ProtocolError::InvalidLength(9))
        ));
    }

    #[test]
    fn test_negative_length_is_corrupt() {
        let buf = (-5i32).to_le_bytes();
        assert!(matches!(
            decode_frame(&buf, Role::Client),
            Decoded::Corrupt(ProtocolError::InvalidLength(-5))
        ));
    }

    #[test]
    fn test_oversized_length_is_corrupt() {
        let buf = ((MAX_FRAME_LENGTH + 1) as i32).to_le_bytes();
        assert!(matches!(
            decode_frame(&buf, Role::Client),
            Decoded::Corrupt(ProtocolError::InvalidLength(_))
        ));
    }

    #[test]
    fn test_unknown_type_is_corrupt() {
        let buf = [10, 0, 0, 0, 1, 0, 0, 0, 7, 0, 0, 0, 0, 0];
        assert!(matches!(
            decode_frame(&buf, Role::Client),
            Decoded::Corrupt(ProtocolError::UnknownPacketType(7))
        ));
    }

    #[test]
    fn test_missing_terminator_is_corrupt() {
        let buf = [11, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, b'x', b'y', 0];
        assert!(matches!(
            decode_frame(&buf, Role::Client),
            Decoded::Corrupt(ProtocolError::MissingTerminator)
        ));
    }

    #[test]
    fn test_payload_too_large_rejected_on_encode() {
        let packet = Packet::new(
            RequestId::new(1),
            PacketType::Command,
            vec![b'a'; MAX_PAYLOAD_SIZE + 1],
        );
        let mut buf = BytesMut::new();
        let result = encode_frame(&packet, &mut buf);
        assert!(matches!(result, Err(ProtocolError::PayloadTooLarge { .. })));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_max_payload_roundtrip() {
        let packet = Packet::new(
            RequestId::new(3),
            PacketType::CommandResponse,
            vec![b'z'; MAX_PAYLOAD_SIZE],
        );
        let buf = encode(&packet);
        assert!(matches!(
            decode_frame(&buf, Role::Client),
            Decoded::Packet { .. }
        ));
    }
}
