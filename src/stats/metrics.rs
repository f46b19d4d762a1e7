//! Statistics for the relay session

/// Session-wide counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Connections that were given a slot
    pub connections_accepted: u64,
    /// Connections turned away for lack of a slot
    pub connections_rejected: u64,
    /// Successful joins
    pub joins: u64,
    /// Join attempts with a wrong token
    pub joins_rejected: u64,
    /// Clients that left, for any reason
    pub leaves: u64,
    /// Frames received from clients
    pub frames_received: u64,
    /// Updates dropped by validation (spoofed owner, unknown target, bad index or size)
    pub updates_dropped: u64,
    /// Updates dropped because the owner id named another client
    pub spoofed_updates: u64,
    /// Updates written to a channel store
    pub updates_applied: u64,
    /// Frames sent while relaying updates
    pub rebroadcasts: u64,
    /// Notices and channel frames sent during snapshot replay
    pub snapshot_frames: u64,
}

impl SessionStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connections currently expected to hold a slot
    pub fn active_connections(&self) -> u64 {
        self.connections_accepted.saturating_sub(self.leaves)
    }

    /// Average fan-out per applied update
    pub fn fanout(&self) -> f64 {
        if self.updates_applied > 0 {
            self.rebroadcasts as f64 / self.updates_applied as f64
        } else {
            0.0
        }
    }
}
