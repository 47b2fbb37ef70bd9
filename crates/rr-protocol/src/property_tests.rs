//! Property tests for the frame encoder and decoder.
//!
//! Covers round-trips for every type a role can receive, the prefix rule
//! for partial frames, and arbitrary input never panicking the decoder.

use bytes::BytesMut;
use proptest::prelude::*;

use crate::frame::{decode_frame, encode_frame, Decoded, MAX_PAYLOAD_SIZE};
use crate::packet::{Packet, PacketType, Role};
use crate::request_id::RequestId;

/// A packet type together with the role that receives it
fn arb_typed_role() -> impl Strategy<Value = (PacketType, Role)> {
    prop_oneof![
        Just((PacketType::Auth, Role::Server)),
        Just((PacketType::Command, Role::Server)),
        Just((PacketType::AuthResponse, Role::Client)),
        Just((PacketType::CommandResponse, Role::Client)),
    ]
}

fn arb_packet() -> impl Strategy<Value = (Packet, Role)> {
    (
        any::<i32>(),
        arb_typed_role(),
        prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
    )
        .prop_map(|(id, (packet_type, role), body)| {
            (Packet::new(RequestId::new(id), packet_type, body), role)
        })
}

/// Bytes that start with a length field in the valid range, so the decoder
/// gets past the first check
fn arb_plausible_frame() -> impl Strategy<Value = Vec<u8>> {
    (10i32..=64, prop::collection::vec(any::<u8>(), 0..80)).prop_map(|(length, rest)| {
        let mut buf = length.to_le_bytes().to_vec();
        buf.extend(rest);
        buf
    })
}

fn encode(packet: &Packet) -> BytesMut {
    let mut buf = BytesMut::new();
    encode_frame(packet, &mut buf).expect("encode");
    buf
}

fn check_decoder_bounds(bytes: &[u8]) -> Result<(), TestCaseError> {
    for role in [Role::Client, Role::Server] {
        if let Decoded::Packet { consumed, .. } = decode_frame(bytes, role) {
            prop_assert!(consumed <= bytes.len());
            prop_assert!(consumed >= 14);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn frame_roundtrip((packet, role) in arb_packet()) {
        let buf = encode(&packet);
        match decode_frame(&buf, role) {
            Decoded::Packet { packet: decoded, consumed } => {
                prop_assert_eq!(consumed, buf.len());
                prop_assert_eq!(decoded, packet);
            }
            other => prop_assert!(false, "expected a packet, got {:?}", other),
        }
    }

    #[test]
    fn proper_prefix_is_incomplete((packet, role) in arb_packet(), cut in any::<prop::sample::Index>()) {
        let buf = encode(&packet);
        let end = cut.index(buf.len());
        prop_assert!(matches!(decode_frame(&buf[..end], role), Decoded::Incomplete));
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        check_decoder_bounds(&bytes)?;
    }

    #[test]
    fn plausible_frames_never_panic(bytes in arb_plausible_frame()) {
        check_decoder_bounds(&bytes)?;
    }
}
