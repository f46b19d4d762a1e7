//! Real-time state relay hub
//!
//! A bounded set of peers join one session and share fixed-size binary
//! "channels". Every accepted channel update is relayed verbatim to the other
//! peers, and a peer that joins late is replayed the roster and all current
//! channel state.
//!
//! # Example
//!
//! ```no_run
//! use channel_relay::{RelayServer, ServerConfig, SessionConfig};
//!
//! # async fn run() -> channel_relay::Result<()> {
//! let session = SessionConfig::from_file("session.json")?;
//! let server = RelayServer::new(ServerConfig::default(), session)?;
//! server.run().await
//! # }
//! ```

pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod stats;

pub use error::{Error, Result};
pub use protocol::{ChannelUpdate, InboundFrame, Notice, OutboundFrame};
pub use registry::{ChannelStore, ClientId, ClientRegistry, RegistryError};
pub use server::{RelayServer, ServerConfig};
pub use session::{ConnectionHandle, PeerQueue, Session, SessionConfig};
pub use stats::SessionStats;
