//! Relay wire protocol
//!
//! Text control frames (join/leave and hub notices) and binary channel
//! update frames.

pub mod constants;
pub mod frame;
pub mod notice;

pub use frame::{ChannelUpdate, InboundFrame, OutboundFrame};
pub use notice::Notice;
