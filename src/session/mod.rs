//! Relay session
//!
//! The session is the whole relay state machine. It consumes connection
//! events and decoded frames, and answers through each client's
//! [`ConnectionHandle`].
//!
//! ```text
//!  connect ──► ClientRegistry::allocate ──► slot (or E1 + close)
//!
//!  InboundFrame ─┬─ Join(token) ──► gate: mark joined, N/I notices,
//!                │                        snapshot replay
//!                ├─ Leave ────────► gate: release slot, L notices
//!                └─ ChannelUpdate ► router: anti-spoof, store, relay
//!
//!  disconnect ──► gate: release slot, L notices
//! ```

pub mod config;
pub mod gate;
pub mod handle;
pub mod router;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, SessionConfig};
pub use handle::{ConnectionHandle, PeerQueue};
pub use state::{LeaveReason, Session};
