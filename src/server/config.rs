//! Server configuration

use std::net::SocketAddr;

use crate::protocol::constants::MAX_CLIENTS;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum simultaneous clients (capped at 127)
    pub max_clients: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,

    /// Capacity of the hub's inbound event queue
    pub hub_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_clients: MAX_CLIENTS,
            tcp_nodelay: true, // Updates are small and latency sensitive
            hub_queue_capacity: 1024,
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set maximum clients
    pub fn max_clients(mut self, max: usize) -> Self {
        self.max_clients = max.min(MAX_CLIENTS);
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }

    /// Set the hub event queue capacity
    pub fn hub_queue_capacity(mut self, capacity: usize) -> Self {
        self.hub_queue_capacity = capacity.max(1);
        self
    }
}
