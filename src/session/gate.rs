//! Join and leave handling
//!
//! ```text
//! Joiner                     Hub                      Others
//!   |---- J<token> ---------->|                          |
//!   |                         |---- N<joiner> ---------->|
//!   |<--- I<joiner> ----------|                          |
//!   |<--- N<other> ... -------|   (snapshot replay)      |
//!   |<--- channel frames -----|                          |
//! ```
//!
//! A wrong token is an eviction, not a refusal: the client is removed as if
//! it had left.

use super::handle::ConnectionHandle;
use super::state::{LeaveReason, Session};
use crate::protocol::Notice;
use crate::registry::ClientId;

impl<H: ConnectionHandle> Session<H> {
    /// Handle a join request
    pub(super) fn join(&mut self, id: ClientId, token: &str) {
        if token != self.secret {
            self.stats.joins_rejected += 1;
            tracing::info!(client = %id, "Join rejected: bad session token");
            self.leave(id, LeaveReason::Rejected);
            return;
        }

        let Some(client) = self.clients.get_mut(id) else {
            return;
        };
        client.joined = true;
        self.stats.joins += 1;

        self.broadcast_except(id, &Notice::Present(id).into());
        self.notify(id, Notice::Assigned(id));

        tracing::info!(
            client = %id,
            clients = self.clients.len(),
            "Client joined"
        );

        self.replay_snapshot(id);
    }

    /// Remove a client and announce its departure
    ///
    /// The slot is released before any notice goes out, so the leaver is
    /// invisible to everything that follows. A client that never joined hears
    /// its own `L<id>` and nobody else does; a joined client's departure is
    /// announced to everyone still connected.
    pub(super) fn leave(&mut self, id: ClientId, reason: LeaveReason) {
        let Some(client) = self.clients.release(id) else {
            return;
        };
        self.stats.leaves += 1;

        let notice = Notice::Left(id);
        if client.joined {
            for other in self.clients.iter() {
                other.handle.send(notice.into());
            }
            // An evicted member still learns why its session ended
            if reason == LeaveReason::Rejected {
                client.handle.send(notice.into());
            }
        } else {
            client.handle.send(notice.into());
        }

        if reason != LeaveReason::Disconnected {
            client.handle.close();
        }

        tracing::info!(
            client = %id,
            reason = ?reason,
            was_joined = client.joined,
            clients = self.clients.len(),
            "Client left"
        );
        tracing::debug!(
            client = %id,
            connection_id = client.connection_id,
            frames_received = client.frames_received,
            rebroadcasts = self.stats.rebroadcasts,
            duration_ms = client.duration().as_millis() as u64,
            "Connection summary"
        );
    }
}
