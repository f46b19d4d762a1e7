//! WebSocket relay server
//!
//! The listener accepts TCP connections, each connection task speaks
//! WebSocket to its peer, and a single hub task owns the session.

pub mod config;
pub mod connection;
pub mod hub;
pub mod listener;

pub use config::ServerConfig;
pub use hub::{Hub, HubEvent, HubHandle};
pub use listener::RelayServer;
