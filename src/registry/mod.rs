//! Client registry and channel stores
//!
//! The registry is a bounded arena of client slots. Each slot carries the
//! client's connection handle, its join flag and its own [`ChannelStore`].
//!
//! # Layout
//!
//! ```text
//!                 ClientRegistry<H>
//!     ┌──────────────────────────────────────────┐
//!     │ slots[0]   Some(Client { handle,         │
//!     │                          joined,         │
//!     │                          channels })     │
//!     │ slots[1]   None          <- next alloc   │
//!     │ slots[2]   Some(Client { .. })           │
//!     │   ...                                    │
//!     │ slots[126] None                          │
//!     └──────────────────────────────────────────┘
//! ```
//!
//! The session-owned store lives beside the registry in
//! [`Session`](crate::session::Session), not in a slot.

pub mod channels;
pub mod entry;
pub mod error;
pub mod store;

pub use channels::ChannelStore;
pub use entry::{Client, ClientId};
pub use error::RegistryError;
pub use store::ClientRegistry;
