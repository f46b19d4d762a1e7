//! Per-connection task
//!
//! Each accepted socket is upgraded to WebSocket and split in two: the reader
//! decodes messages into [`InboundFrame`]s for the hub, and a writer task
//! drains the connection's [`PeerQueue`] onto the socket.

use std::net::SocketAddr;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;

use crate::error::{Error, Result};
use crate::protocol::{InboundFrame, OutboundFrame};
use crate::server::hub::HubHandle;
use crate::session::PeerQueue;

/// A single client connection
pub struct Connection {
    connection_id: u64,
    peer_addr: SocketAddr,
    hub: HubHandle,
}

impl Connection {
    /// Create a connection bound to the hub
    pub fn new(connection_id: u64, peer_addr: SocketAddr, hub: HubHandle) -> Self {
        Self {
            connection_id,
            peer_addr,
            hub,
        }
    }

    /// Run the connection until the peer goes away or the hub closes it
    pub async fn run(self, socket: TcpStream) -> Result<()> {
        let ws = tokio_tungstenite::accept_async(socket).await?;
        let (mut sink, mut source) = ws.split();
        let (queue, mut outbound) = PeerQueue::new();

        let connection_id = self.connection_id;
        let writer = tokio::spawn(async move {
            while let Some(frame) = outbound.recv().await {
                let message = match frame {
                    OutboundFrame::Text(text) => Message::Text(text),
                    OutboundFrame::Binary(data) => Message::Binary(data.to_vec()),
                    OutboundFrame::Close => break,
                };

                if let Err(e) = sink.send(message).await {
                    tracing::debug!(
                        connection_id = connection_id,
                        error = %e,
                        "Write failed"
                    );
                    return;
                }
            }

            // Close requested, or the hub released the slot
            let _ = sink.close().await;
        });

        let client = match self.hub.connect(self.connection_id, queue).await {
            Ok(client) => client,
            Err(Error::Registry(err)) => {
                tracing::info!(
                    connection_id = self.connection_id,
                    peer = %self.peer_addr,
                    error = %err,
                    "Connection refused"
                );
                // The hub already queued E1 and a close
                let _ = writer.await;
                return Ok(());
            }
            Err(e) => {
                writer.abort();
                return Err(e);
            }
        };

        tracing::debug!(
            client = %client,
            connection_id = self.connection_id,
            peer = %self.peer_addr,
            "Slot assigned"
        );

        while let Some(message) = source.next().await {
            let frame = match message {
                Ok(Message::Text(text)) => InboundFrame::from_text(&text),
                Ok(Message::Binary(data)) => InboundFrame::from_binary(Bytes::from(data)),
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!(
                        client = %client,
                        connection_id = self.connection_id,
                        error = %e,
                        "Read failed"
                    );
                    break;
                }
            };

            match frame {
                Some(frame) => self.hub.frame(client, self.connection_id, frame).await?,
                None => {
                    tracing::trace!(client = %client, "Malformed frame dropped");
                }
            }
        }

        self.hub.disconnect(client, self.connection_id).await?;
        let _ = writer.await;

        Ok(())
    }
}
