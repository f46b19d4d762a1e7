//! Shared helpers for session tests

use tokio::sync::mpsc::UnboundedReceiver;

use super::{PeerQueue, Session, SessionConfig};
use crate::protocol::{ChannelUpdate, InboundFrame, OutboundFrame};
use crate::registry::ClientId;

pub const SECRET: &str = "s3cret";

/// Session channels: [4, 1]; client channels: [3, 2]
pub fn config() -> SessionConfig {
    SessionConfig::new(SECRET, vec![4, 1], vec![3, 2])
}

pub fn session() -> Session<PeerQueue> {
    Session::new(&config())
}

pub fn connect(
    session: &mut Session<PeerQueue>,
    connection_id: u64,
) -> (ClientId, UnboundedReceiver<OutboundFrame>) {
    let (queue, rx) = PeerQueue::new();
    let id = session.connect(connection_id, queue).unwrap();
    (id, rx)
}

/// Connect and join, discarding everything the join produced
pub fn connect_joined(
    session: &mut Session<PeerQueue>,
    connection_id: u64,
) -> (ClientId, UnboundedReceiver<OutboundFrame>) {
    let (id, mut rx) = connect(session, connection_id);
    session.handle_frame(id, connection_id, InboundFrame::Join(SECRET.into()));
    drain(&mut rx);
    (id, rx)
}

pub fn drain(rx: &mut UnboundedReceiver<OutboundFrame>) -> Vec<OutboundFrame> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}

pub fn update(owner: i8, channel: i8, payload: &[u8]) -> InboundFrame {
    InboundFrame::from_binary(ChannelUpdate::encode(owner, channel, payload)).unwrap()
}

pub fn text(s: &str) -> OutboundFrame {
    OutboundFrame::Text(s.to_string())
}

pub fn binary(owner: i8, channel: i8, payload: &[u8]) -> OutboundFrame {
    OutboundFrame::Binary(ChannelUpdate::encode(owner, channel, payload))
}
