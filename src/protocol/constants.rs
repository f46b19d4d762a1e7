//! Protocol constants

/// Maximum number of simultaneously connected clients.
///
/// Owner ids travel as a signed byte, so `0..=126` is the usable client range.
pub const MAX_CLIENTS: usize = 127;

/// Owner id that addresses the session-owned channels
pub const SESSION_OWNER: i8 = -1;

/// Size of the channel update header (owner id + channel number)
pub const UPDATE_HEADER_SIZE: usize = 2;

/// Shortest binary frame that is processed (header plus one payload byte)
pub const MIN_UPDATE_LEN: usize = UPDATE_HEADER_SIZE + 1;

/// Largest channel table a store can address (channel numbers are `i8`)
pub const MAX_CHANNELS: usize = 128;

// Text frame tags
pub const TAG_JOIN: char = 'J';
pub const TAG_LEAVE: char = 'L';
pub const TAG_ASSIGNED: char = 'I';
pub const TAG_PRESENT: char = 'N';
pub const TAG_ERROR: char = 'E';

/// Error code sent before closing a connection that found no free slot
pub const ERROR_CAPACITY: u8 = 1;
