//! Authenticated RCON session over one connection
//!
//! A [`Session`] lives exactly as long as the connection it was created
//! for. It performs the auth handshake, hands out request ids, and routes
//! each `CommandResponse` to the caller waiting on that id. Responses are
//! matched by id only, so the peer may answer in any order.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use rr_core::{CommandError, ConnectionError};
use rr_protocol::{Packet, PacketType, RequestId, MAX_PAYLOAD_SIZE};

use crate::transport::{PacketStream, PacketWriter};

type Completion = oneshot::Sender<Result<String, CommandError>>;

/// A command waiting for its response
struct PendingRequest {
    submitted_at: Instant,
    completion: Completion,
}

/// Request ids in flight plus the id allocator.
///
/// `closed` is set when the connection is lost; from then on nothing can be
/// inserted, so a send racing the disconnect either gets drained with
/// `ConnectionLost` or sees the flag.
struct PendingTable {
    entries: HashMap<RequestId, PendingRequest>,
    next_id: RequestId,
    closed: bool,
}

impl PendingTable {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_id: RequestId::FIRST,
            closed: false,
        }
    }

    /// Next id not currently in flight
    fn allocate(&mut self) -> RequestId {
        loop {
            let id = self.next_id;
            self.next_id = id.next();
            if !self.entries.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Removes a request's entry when dropped while armed.
///
/// Armed from insertion until the command packet is written, so a send that
/// fails or is abandoned before reaching the wire gives its slot back.
struct PendingGuard<'a> {
    session: &'a Session,
    request_id: RequestId,
    armed: bool,
}

impl PendingGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.lock_table().entries.remove(&self.request_id);
        }
    }
}

/// One authenticated connection's request/response state
pub struct Session {
    writer: PacketWriter,
    pending: Mutex<PendingTable>,
    max_pending: usize,
    request_timeout: Option<Duration>,
}

impl Session {
    /// Create a session over a freshly opened connection
    pub fn new(writer: PacketWriter, max_pending: usize, request_timeout: Option<Duration>) -> Self {
        Self {
            writer,
            pending: Mutex::new(PendingTable::new()),
            max_pending,
            request_timeout,
        }
    }

    /// Send the password and wait for the peer's verdict.
    ///
    /// Command responses arriving before the auth response are skipped;
    /// some servers send an empty one first.
    pub async fn authenticate(
        &self,
        packets: &mut PacketStream,
        password: &str,
        auth_timeout: Duration,
    ) -> Result<(), ConnectionError> {
        let auth_id = self.lock_table().allocate();
        self.writer
            .write_packet(Packet::auth(auth_id, password))
            .await?;

        tokio::time::timeout(auth_timeout, wait_for_auth_response(packets, auth_id))
            .await
            .map_err(|_| ConnectionError::AuthTimeout(auth_timeout))?
    }

    /// Send a command and wait for the response payload
    pub async fn send_command(&self, command: &str) -> Result<String, CommandError> {
        if command.len() > MAX_PAYLOAD_SIZE {
            return Err(CommandError::Write(format!(
                "command is {} bytes, maximum is {}",
                command.len(),
                MAX_PAYLOAD_SIZE
            )));
        }

        let (tx, rx) = oneshot::channel();
        let request_id = {
            let mut table = self.lock_table();
            if table.closed {
                return Err(CommandError::NotConnected);
            }
            if table.entries.len() >= self.max_pending {
                return Err(CommandError::TooManyPending {
                    max: self.max_pending,
                });
            }
            let id = table.allocate();
            table.entries.insert(
                id,
                PendingRequest {
                    submitted_at: Instant::now(),
                    completion: tx,
                },
            );
            id
        };

        let guard = PendingGuard {
            session: self,
            request_id,
            armed: true,
        };
        self.writer
            .write_packet(Packet::command(request_id, command))
            .await
            .map_err(|e| CommandError::Write(e.to_string()))?;
        guard.disarm();

        tracing::trace!("Sent command {}", request_id);

        let received = match self.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received,
                Err(_) => return Err(CommandError::Timeout(limit)),
            },
            None => rx.await,
        };

        match received {
            Ok(result) => result,
            Err(_) => Err(CommandError::ConnectionLost("session dropped".to_string())),
        }
    }

    /// Route an inbound packet to whoever is waiting on its id
    pub fn dispatch(&self, packet: Packet) {
        if packet.packet_type != PacketType::CommandResponse {
            tracing::debug!(
                "Ignoring unexpected {:?} packet ({})",
                packet.packet_type,
                packet.request_id
            );
            return;
        }

        let entry = self.lock_table().entries.remove(&packet.request_id);
        match entry {
            Some(pending) => {
                tracing::trace!(
                    "Response for {} after {:?}",
                    packet.request_id,
                    pending.submitted_at.elapsed()
                );
                // The caller may have stopped waiting; that's fine
                let _ = pending.completion.send(Ok(packet.body_text().into_owned()));
            }
            None => {
                tracing::debug!("Discarding response for unknown {}", packet.request_id);
            }
        }
    }

    /// Fail every in-flight command and refuse new ones.
    ///
    /// Returns how many requests were failed.
    pub fn fail_all(&self, reason: &str) -> usize {
        let drained: Vec<PendingRequest> = {
            let mut table = self.lock_table();
            table.closed = true;
            table.entries.drain().map(|(_, pending)| pending).collect()
        };

        let count = drained.len();
        for pending in drained {
            let _ = pending
                .completion
                .send(Err(CommandError::ConnectionLost(reason.to_string())));
        }
        count
    }

    /// Number of commands awaiting a response
    pub fn pending_count(&self) -> usize {
        self.lock_table().entries.len()
    }

    /// Shut down the write side of the connection
    pub async fn close(&self) {
        self.writer.close().await;
    }

    fn lock_table(&self) -> MutexGuard<'_, PendingTable> {
        // Every update is a single map call, so a poisoned table is still consistent
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn wait_for_auth_response(
    packets: &mut PacketStream,
    auth_id: RequestId,
) -> Result<(), ConnectionError> {
    loop {
        let packet = packets.next_packet().await?;
        match packet.packet_type {
            PacketType::AuthResponse if packet.request_id == auth_id => return Ok(()),
            PacketType::AuthResponse if packet.is_auth_rejection() => {
                return Err(ConnectionError::AuthFailed)
            }
            _ => {
                tracing::debug!(
                    "Skipping {:?} packet ({}) while authenticating",
                    packet.packet_type,
                    packet.request_id
                );
            }
        }
    }
}
