//! Error types

use thiserror::Error;

use crate::registry::RegistryError;
use crate::session::ConfigError;

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("hub task has stopped")]
    HubClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
