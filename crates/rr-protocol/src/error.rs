//! Protocol error types

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Declared frame length is outside the valid range
    #[error("Invalid frame length: {0}")]
    InvalidLength(i32),

    /// Packet type code not valid for the decoding side
    #[error("Unknown packet type: {0}")]
    UnknownPacketType(i32),

    /// Frame did not end with the two null terminators
    #[error("Frame is missing its null terminators")]
    MissingTerminator,

    /// Payload exceeds maximum size
    #[error("Payload too large: {size} bytes exceeds maximum of {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Whether the peer sent bytes that cannot be framed, leaving the
    /// decoder out of sync with the stream.
    pub fn is_corrupt_frame(&self) -> bool {
        matches!(
            self,
            ProtocolError::InvalidLength(_)
                | ProtocolError::UnknownPacketType(_)
                | ProtocolError::MissingTerminator
        )
    }
}
