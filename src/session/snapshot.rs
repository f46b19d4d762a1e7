//! Late-joiner snapshot replay
//!
//! Right after a successful join the new client is sent, in order:
//!
//! 1. `N<id>` for every other mapped client
//! 2. every populated session channel as an update frame with owner -1
//! 3. every populated channel of every other mapped client
//!
//! Replayed frames use the live update layout, so the joiner handles them
//! exactly like relayed traffic.

use super::handle::ConnectionHandle;
use super::state::Session;
use crate::protocol::constants::SESSION_OWNER;
use crate::protocol::{ChannelUpdate, Notice, OutboundFrame};
use crate::registry::{ChannelStore, ClientId};

impl<H: ConnectionHandle> Session<H> {
    /// Send the roster and all known channel state to a newly joined client
    pub(super) fn replay_snapshot(&mut self, id: ClientId) {
        let Some(joiner) = self.clients.get(id) else {
            return;
        };
        let handle = &joiner.handle;
        let mut sent = 0u64;

        for other in self.clients.others(id) {
            handle.send(Notice::Present(other.id).into());
            sent += 1;
        }

        sent += send_store(handle, SESSION_OWNER, &self.channels);

        for other in self.clients.others(id) {
            sent += send_store(handle, other.id.as_owner(), &other.channels);
        }

        self.stats.snapshot_frames += sent;

        tracing::debug!(client = %id, frames = sent, "Snapshot replayed");
    }
}

/// Send every populated channel of a store; returns the number of frames
fn send_store<H: ConnectionHandle>(handle: &H, owner: i8, store: &ChannelStore) -> u64 {
    let mut sent = 0;
    for (index, data) in store.iter() {
        // Stores never exceed 128 channels, so every index fits
        let Ok(channel) = i8::try_from(index) else {
            continue;
        };
        handle.send(OutboundFrame::Binary(ChannelUpdate::encode(owner, channel, data)));
        sent += 1;
    }
    sent
}
