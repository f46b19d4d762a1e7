//! Outbound connection handles
//!
//! The session never writes to sockets directly. It hands frames to a
//! [`ConnectionHandle`], which must not block: a slow peer would otherwise
//! stall every other recipient and the next inbound frame.

use tokio::sync::mpsc;

use crate::protocol::OutboundFrame;

/// Outbound side of one client connection
pub trait ConnectionHandle {
    /// Queue a frame for delivery
    ///
    /// Delivery failures are ignored; a dead connection is reported to the
    /// session separately as a disconnect.
    fn send(&self, frame: OutboundFrame);

    /// Close the connection after every frame queued so far
    fn close(&self);
}

/// Per-connection outbound queue
///
/// Frames are drained in order by the connection's writer task.
#[derive(Debug, Clone)]
pub struct PeerQueue {
    tx: mpsc::UnboundedSender<OutboundFrame>,
}

impl PeerQueue {
    /// Create a queue and the receiver its writer drains
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Whether the writer side has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl ConnectionHandle for PeerQueue {
    fn send(&self, frame: OutboundFrame) {
        // Err only means the writer task has already exited
        let _ = self.tx.send(frame);
    }

    fn close(&self) {
        let _ = self.tx.send(OutboundFrame::Close);
    }
}
