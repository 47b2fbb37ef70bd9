//! Outbound RCON connection
//!
//! Opens the TCP stream to the game server and splits it into a packet
//! sink and a packet sequence. Partial frames are buffered by the framed
//! reader across reads, so no bytes are dropped or duplicated.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, FramedWrite};

use rr_core::ConnectionError;
use rr_protocol::{Packet, PacketCodec};

type BoxedRead = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWrite = Box<dyn AsyncWrite + Send + Unpin>;

/// Opens connections to the RCON peer
pub struct Transport;

impl Transport {
    /// Connect to `address`, giving up after `connect_timeout`
    pub async fn open(
        address: &str,
        connect_timeout: Duration,
    ) -> Result<Connection, ConnectionError> {
        tracing::debug!("Connecting to {}", address);

        let stream = tokio::time::timeout(connect_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| ConnectionError::Connect {
                address: address.to_string(),
                reason: format!("timed out after {:?}", connect_timeout),
            })?
            .map_err(|e| ConnectionError::Connect {
                address: address.to_string(),
                reason: e.to_string(),
            })?;

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!("Failed to set TCP_NODELAY: {}", e);
        }

        let (reader, writer) = stream.into_split();
        Ok(Connection::from_io(reader, writer))
    }
}

/// An open byte stream to the peer, not yet split
pub struct Connection {
    writer: PacketWriter,
    packets: PacketStream,
}

impl Connection {
    /// Wrap an arbitrary read/write pair, speaking the client side of the
    /// protocol
    pub fn from_io<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            writer: PacketWriter::new(Box::new(writer)),
            packets: PacketStream::new(Box::new(reader)),
        }
    }

    /// Separate the outbound sink from the inbound packet sequence
    pub fn split(self) -> (PacketWriter, PacketStream) {
        (self.writer, self.packets)
    }
}

/// Outbound half: serializes concurrent writers onto the stream
pub struct PacketWriter {
    sink: Mutex<Option<FramedWrite<BoxedWrite, PacketCodec>>>,
}

impl PacketWriter {
    fn new(writer: BoxedWrite) -> Self {
        Self {
            sink: Mutex::new(Some(FramedWrite::new(writer, PacketCodec::client()))),
        }
    }

    /// Encode and flush one packet
    pub async fn write_packet(&self, packet: Packet) -> Result<(), ConnectionError> {
        let mut guard = self.sink.lock().await;
        let sink = guard
            .as_mut()
            .ok_or_else(|| ConnectionError::Write("stream is closed".to_string()))?;

        if let Err(e) = sink.send(packet).await {
            if !matches!(e, rr_protocol::ProtocolError::PayloadTooLarge { .. }) {
                // The stream is unusable after an I/O failure
                *guard = None;
            }
            return Err(ConnectionError::Write(e.to_string()));
        }
        Ok(())
    }

    /// Flush and shut down the write side; later writes fail
    pub async fn close(&self) {
        if let Some(mut sink) = self.sink.lock().await.take() {
            if let Err(e) = sink.close().await {
                tracing::debug!("Error closing RCON stream: {}", e);
            }
        }
    }
}

/// Inbound half: a lazy, non-restartable sequence of decoded packets
pub struct PacketStream {
    frames: FramedRead<BoxedRead, PacketCodec>,
    finished: bool,
}

impl PacketStream {
    fn new(reader: BoxedRead) -> Self {
        Self {
            frames: FramedRead::new(reader, PacketCodec::client()),
            finished: false,
        }
    }

    /// Wait for the next packet.
    ///
    /// The first error is the reason the stream ended: the peer closed it,
    /// an I/O error occurred, or a corrupt frame arrived. Every call after
    /// that reports [`ConnectionError::StreamClosed`] without reading.
    pub async fn next_packet(&mut self) -> Result<Packet, ConnectionError> {
        if self.finished {
            return Err(ConnectionError::StreamClosed("stream already ended".to_string()));
        }

        let err = match self.frames.next().await {
            Some(Ok(packet)) => return Ok(packet),
            Some(Err(e)) if e.is_corrupt_frame() => ConnectionError::CorruptFrame(e),
            Some(Err(e)) => ConnectionError::StreamClosed(e.to_string()),
            None => ConnectionError::StreamClosed("closed by peer".to_string()),
        };

        self.finished = true;
        Err(err)
    }

    /// Whether the terminal event has been produced
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
