//! Frame decoding and encoding
//!
//! Inbound traffic is either a text control frame or a binary channel update:
//!
//! ```text
//! Text:    "J<token>"  join with session token
//!          "L"         leave
//!
//! Binary:  +----------+------------+----------------------+
//!          | owner i8 | channel i8 | payload (remainder)  |
//!          +----------+------------+----------------------+
//!            -1 = session-owned channel, 0..=126 = client
//! ```
//!
//! Both are folded into a single [`InboundFrame`] so the session dispatches
//! on one type instead of re-inspecting transport message kinds.

use bytes::{BufMut, Bytes, BytesMut};

use super::constants::{MIN_UPDATE_LEN, TAG_JOIN, TAG_LEAVE, UPDATE_HEADER_SIZE};

/// A decoded frame from a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// Join request carrying the offered session token
    Join(String),
    /// Leave request
    Leave,
    /// Channel update
    ChannelUpdate(ChannelUpdate),
}

impl InboundFrame {
    /// Decode a text control frame
    ///
    /// Returns `None` for anything that is not a join or the literal leave frame.
    pub fn from_text(text: &str) -> Option<Self> {
        if let Some(token) = text.strip_prefix(TAG_JOIN) {
            return Some(InboundFrame::Join(token.to_string()));
        }

        if text.len() == TAG_LEAVE.len_utf8() && text.starts_with(TAG_LEAVE) {
            return Some(InboundFrame::Leave);
        }

        None
    }

    /// Decode a binary frame
    ///
    /// Returns `None` if the frame is too short to carry a header and payload.
    pub fn from_binary(data: Bytes) -> Option<Self> {
        ChannelUpdate::decode(data).map(InboundFrame::ChannelUpdate)
    }

    /// Short name used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            InboundFrame::Join(_) => "join",
            InboundFrame::Leave => "leave",
            InboundFrame::ChannelUpdate(_) => "update",
        }
    }
}

/// A channel update frame
///
/// Keeps the complete frame so it can be relayed verbatim. Cloning is cheap
/// since `Bytes` is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelUpdate {
    /// Declared owner (-1 for the session)
    pub owner: i8,
    /// Channel number within the owner's store
    pub channel: i8,
    /// The frame exactly as received, header included
    raw: Bytes,
}

impl ChannelUpdate {
    /// Decode an update from a complete binary frame
    pub fn decode(raw: Bytes) -> Option<Self> {
        if raw.len() < MIN_UPDATE_LEN {
            return None;
        }

        Some(Self {
            owner: raw[0] as i8,
            channel: raw[1] as i8,
            raw,
        })
    }

    /// Build a frame with the live-update layout
    pub fn encode(owner: i8, channel: i8, payload: &[u8]) -> Bytes {
        let mut buf = BytesMut::with_capacity(UPDATE_HEADER_SIZE + payload.len());
        buf.put_i8(owner);
        buf.put_i8(channel);
        buf.put_slice(payload);
        buf.freeze()
    }

    /// Payload bytes following the header (zero-copy)
    pub fn payload(&self) -> Bytes {
        self.raw.slice(UPDATE_HEADER_SIZE..)
    }

    /// The original frame, header included
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Whether the update targets the session-owned store
    pub fn is_session_owned(&self) -> bool {
        self.owner < 0
    }
}

/// A frame queued for delivery to one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Text control frame
    Text(String),
    /// Binary channel update
    Binary(Bytes),
    /// Close the connection once everything queued before it is sent
    Close,
}
