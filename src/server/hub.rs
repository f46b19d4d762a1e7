//! Hub task
//!
//! All session state lives in one task. Connection tasks send it events over
//! a single queue and it handles them one at a time, to completion, in
//! arrival order:
//!
//! ```text
//!  [conn 0 reader] ──┐                         ┌──► PeerQueue 0 ──► [writer 0]
//!  [conn 1 reader] ──┼──► mpsc ──► Hub task ───┼──► PeerQueue 1 ──► [writer 1]
//!  [conn 2 reader] ──┘     (Session owned)     └──► PeerQueue 2 ──► [writer 2]
//! ```
//!
//! Fan-out only enqueues onto per-connection queues, so a slow socket delays
//! its own writer and nothing else. Each recipient still sees events in the
//! order the hub processed them.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::protocol::InboundFrame;
use crate::registry::{ClientId, RegistryError};
use crate::session::{PeerQueue, Session};
use crate::stats::SessionStats;

/// Event delivered to the hub task
#[derive(Debug)]
pub enum HubEvent {
    /// A connection was accepted and wants a slot
    Connect {
        connection_id: u64,
        handle: PeerQueue,
        reply: oneshot::Sender<std::result::Result<ClientId, RegistryError>>,
    },
    /// A frame arrived from a client
    Frame {
        client: ClientId,
        connection_id: u64,
        frame: InboundFrame,
    },
    /// A client's connection ended
    Disconnect { client: ClientId, connection_id: u64 },
    /// Snapshot of the session counters
    Stats { reply: oneshot::Sender<SessionStats> },
}

/// Cloneable handle for talking to the hub task
#[derive(Debug, Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<HubEvent>,
}

impl HubHandle {
    /// Request a slot for a new connection
    pub async fn connect(&self, connection_id: u64, handle: PeerQueue) -> Result<ClientId> {
        let (reply, rx) = oneshot::channel();
        self.send(HubEvent::Connect {
            connection_id,
            handle,
            reply,
        })
        .await?;

        Ok(rx.await.map_err(|_| Error::HubClosed)??)
    }

    /// Forward a decoded frame
    pub async fn frame(&self, client: ClientId, connection_id: u64, frame: InboundFrame) -> Result<()> {
        self.send(HubEvent::Frame {
            client,
            connection_id,
            frame,
        })
        .await
    }

    /// Report that a connection ended
    pub async fn disconnect(&self, client: ClientId, connection_id: u64) -> Result<()> {
        self.send(HubEvent::Disconnect {
            client,
            connection_id,
        })
        .await
    }

    /// Get the current session counters
    pub async fn stats(&self) -> Result<SessionStats> {
        let (reply, rx) = oneshot::channel();
        self.send(HubEvent::Stats { reply }).await?;
        rx.await.map_err(|_| Error::HubClosed)
    }

    async fn send(&self, event: HubEvent) -> Result<()> {
        self.tx.send(event).await.map_err(|_| Error::HubClosed)
    }
}

/// The task that owns the session
pub struct Hub {
    session: Session<PeerQueue>,
    rx: mpsc::Receiver<HubEvent>,
}

impl Hub {
    /// Spawn the hub task
    ///
    /// The task runs until every [`HubHandle`] has been dropped.
    pub fn spawn(session: Session<PeerQueue>, queue_capacity: usize) -> (HubHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let hub = Self { session, rx };

        let task = tokio::spawn(hub.run());
        (HubHandle { tx }, task)
    }

    async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            self.dispatch(event);
        }

        tracing::debug!("Hub stopped");
    }

    fn dispatch(&mut self, event: HubEvent) {
        match event {
            HubEvent::Connect {
                connection_id,
                handle,
                reply,
            } => {
                let result = self.session.connect(connection_id, handle);
                let assigned = result.as_ref().ok().copied();

                if reply.send(result).is_err() {
                    // Connection task went away before it learned its slot
                    if let Some(id) = assigned {
                        self.session.disconnect(id, connection_id);
                    }
                }
            }
            HubEvent::Frame {
                client,
                connection_id,
                frame,
            } => self.session.handle_frame(client, connection_id, frame),
            HubEvent::Disconnect {
                client,
                connection_id,
            } => self.session.disconnect(client, connection_id),
            HubEvent::Stats { reply } => {
                let _ = reply.send(self.session.stats().clone());
            }
        }
    }
}
