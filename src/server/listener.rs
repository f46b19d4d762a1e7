//! Relay server listener
//!
//! Handles TCP accept loop and spawns connection handlers.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::{TcpListener, TcpStream};

use crate::error::Result;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::server::hub::{Hub, HubHandle};
use crate::session::{Session, SessionConfig};

/// Relay server
pub struct RelayServer {
    config: ServerConfig,
    session_config: SessionConfig,
    next_connection_id: AtomicU64,
}

impl RelayServer {
    /// Create a new server
    ///
    /// Fails if the session's channel tables are unusable.
    pub fn new(config: ServerConfig, session_config: SessionConfig) -> Result<Self> {
        session_config.validate()?;

        Ok(Self {
            config,
            session_config,
            next_connection_id: AtomicU64::new(1),
        })
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let session = Session::with_capacity(&self.session_config, self.config.max_clients);
        let (hub, hub_task) = Hub::spawn(session, self.config.hub_queue_capacity);

        tracing::info!(
            addr = %listener.local_addr()?,
            max_clients = self.config.max_clients,
            session_channels = self.session_config.session_channels.len(),
            client_channels = self.session_config.client_channels.len(),
            "Relay server listening"
        );

        let result = tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.accept_loop(&listener, &hub) => result,
        };

        if let Ok(stats) = hub.stats().await {
            tracing::info!(
                connections = stats.connections_accepted,
                rejected = stats.connections_rejected,
                frames = stats.frames_received,
                rebroadcasts = stats.rebroadcasts,
                "Session totals"
            );
        }

        // Connection tasks hold hub handles, so stop the hub explicitly
        hub_task.abort();

        result
    }

    async fn accept_loop(&self, listener: &TcpListener, hub: &HubHandle) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr, hub);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr, hub: &HubHandle) {
        let connection_id = self.next_connection_id.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            connection_id = connection_id,
            peer = %peer_addr,
            "New connection"
        );

        if self.config.tcp_nodelay {
            if let Err(e) = socket.set_nodelay(true) {
                tracing::error!(error = %e, "Failed to configure socket");
                return;
            }
        }

        let connection = Connection::new(connection_id, peer_addr, hub.clone());

        tokio::spawn(async move {
            if let Err(e) = connection.run(socket).await {
                tracing::debug!(
                    connection_id = connection_id,
                    error = %e,
                    "Connection error"
                );
            }

            tracing::debug!(connection_id = connection_id, "Connection closed");
        });
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
