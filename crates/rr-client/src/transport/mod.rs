//! Byte stream ownership and reconnect timing

mod connector;
mod reconnect;

pub use connector::{Connection, PacketStream, PacketWriter, Transport};
pub use reconnect::FixedBackoff;
