//! Session state
//!
//! One [`Session`] holds everything the relay knows: the client registry and
//! the session-owned channel store. It is driven one event at a time by a
//! single owner, so nothing here is locked.

use super::config::SessionConfig;
use super::handle::ConnectionHandle;
use crate::protocol::{InboundFrame, Notice, OutboundFrame};
use crate::registry::{ChannelStore, ClientId, ClientRegistry, RegistryError};
use crate::stats::SessionStats;

/// Why a client is leaving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    /// Client sent `L`
    Requested,
    /// Client offered the wrong session token
    Rejected,
    /// Connection was lost
    Disconnected,
}

/// The single relay session
pub struct Session<H> {
    /// Token a client must present to join
    pub(super) secret: String,

    /// Connected clients
    pub(super) clients: ClientRegistry<H>,

    /// Session-owned channels (owner id -1)
    pub(super) channels: ChannelStore,

    /// Counters
    pub(super) stats: SessionStats,
}

impl<H: ConnectionHandle> Session<H> {
    /// Create a session with the full client capacity
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_capacity(config, crate::protocol::constants::MAX_CLIENTS)
    }

    /// Create a session with a reduced client capacity
    pub fn with_capacity(config: &SessionConfig, capacity: usize) -> Self {
        Self {
            secret: config.secret.clone(),
            clients: ClientRegistry::with_capacity(capacity, config.client_sizes()),
            channels: ChannelStore::new(config.session_sizes()),
            stats: SessionStats::new(),
        }
    }

    /// Accept a new connection
    ///
    /// On success the client holds a slot but is not yet joined. When every
    /// slot is taken the connection is sent `E1` and closed.
    pub fn connect(&mut self, connection_id: u64, handle: H) -> Result<ClientId, RegistryError> {
        if self.clients.is_full() {
            self.stats.connections_rejected += 1;
            tracing::warn!(
                connection_id = connection_id,
                capacity = self.clients.capacity(),
                "Connection rejected: no free slot"
            );

            handle.send(Notice::CapacityExceeded.into());
            handle.close();
            return Err(RegistryError::CapacityExceeded {
                capacity: self.clients.capacity(),
            });
        }

        let id = self.clients.allocate(connection_id, handle)?;
        self.stats.connections_accepted += 1;

        tracing::debug!(
            client = %id,
            connection_id = connection_id,
            clients = self.clients.len(),
            "Client connected"
        );

        Ok(id)
    }

    /// Handle one decoded frame from a connected client
    ///
    /// Frames from a connection that no longer owns the slot are ignored.
    pub fn handle_frame(&mut self, id: ClientId, connection_id: u64, frame: InboundFrame) {
        let Some(client) = self.clients.get_connection_mut(id, connection_id) else {
            tracing::trace!(
                client = %id,
                connection_id = connection_id,
                kind = frame.kind(),
                "Frame from stale connection ignored"
            );
            return;
        };

        client.frames_received += 1;
        self.stats.frames_received += 1;

        match frame {
            InboundFrame::Join(token) => self.join(id, &token),
            InboundFrame::Leave => self.leave(id, LeaveReason::Requested),
            InboundFrame::ChannelUpdate(update) => self.relay_update(id, update),
        }
    }

    /// Handle loss of a client's connection
    pub fn disconnect(&mut self, id: ClientId, connection_id: u64) {
        if self.clients.get_connection_mut(id, connection_id).is_none() {
            // Already removed by a leave or eviction
            return;
        }

        self.leave(id, LeaveReason::Disconnected);
    }

    /// Send a frame to every mapped client except one
    ///
    /// Returns the number of recipients.
    pub(super) fn broadcast_except(&self, except: ClientId, frame: &OutboundFrame) -> u64 {
        let mut sent = 0;
        for client in self.clients.others(except) {
            client.handle.send(frame.clone());
            sent += 1;
        }
        sent
    }

    /// Send a notice to one client
    pub(super) fn notify(&self, to: ClientId, notice: Notice) {
        if let Some(client) = self.clients.get(to) {
            client.handle.send(notice.into());
        }
    }

    /// Connected clients
    pub fn clients(&self) -> &ClientRegistry<H> {
        &self.clients
    }

    /// Session-owned channel store
    pub fn session_channels(&self) -> &ChannelStore {
        &self.channels
    }

    /// Current counters
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}
