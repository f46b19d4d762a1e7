//! Client slot types
//!
//! This module defines the per-client state stored in the registry.

use std::fmt;
use std::time::Instant;

use super::channels::ChannelStore;
use crate::protocol::constants::MAX_CLIENTS;

/// Registry slot index identifying a connected client
///
/// Always in `0..MAX_CLIENTS`, so it fits the signed owner byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(u8);

impl ClientId {
    /// Create an id from a slot index
    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < MAX_CLIENTS).then_some(Self(index))
    }

    /// Interpret a wire owner id; negative values are the session, not a client
    pub fn from_owner(owner: i8) -> Option<Self> {
        u8::try_from(owner).ok().and_then(Self::new)
    }

    /// Slot index
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Owner id as it appears in update frames
    pub fn as_owner(self) -> i8 {
        self.0 as i8
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A connected client occupying a registry slot
pub struct Client<H> {
    /// Slot index
    pub id: ClientId,

    /// Hub-unique id of the connection that owns this slot
    pub connection_id: u64,

    /// Outbound side of the connection
    pub handle: H,

    /// Whether the client has presented the session secret
    pub joined: bool,

    /// Client-owned channels
    pub channels: ChannelStore,

    /// Frames received from this client
    pub frames_received: u64,

    /// When the connection was accepted
    pub connected_at: Instant,
}

impl<H> Client<H> {
    pub(super) fn new(id: ClientId, connection_id: u64, handle: H, channels: ChannelStore) -> Self {
        Self {
            id,
            connection_id,
            handle,
            joined: false,
            channels,
            frames_received: 0,
            connected_at: Instant::now(),
        }
    }

    /// Time since the connection was accepted
    pub fn duration(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }
}

impl<H> fmt::Debug for Client<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id)
            .field("connection_id", &self.connection_id)
            .field("joined", &self.joined)
            .field("channels", &self.channels.populated())
            .field("frames_received", &self.frames_received)
            .finish()
    }
}
