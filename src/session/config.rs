//! Session configuration
//!
//! Loaded once at startup from a JSON file:
//!
//! ```json
//! {
//!     "sessionId": "6f1c2a0e",
//!     "serverChannels": [4, 16],
//!     "clientChannels": [12, 2]
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::constants::MAX_CHANNELS;

/// Error type for loading and validating a session configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{table} table has {count} channels, at most {max} are addressable", max = MAX_CHANNELS)]
    TooManyChannels { table: &'static str, count: usize },

    #[error("{table} channel {index} has size 0 and could never be written")]
    ZeroSizedChannel { table: &'static str, index: usize },
}

/// Session secret and channel layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Token a client must present to join
    #[serde(rename = "sessionId")]
    pub secret: String,

    /// Sizes of the session-owned channels
    #[serde(rename = "serverChannels", default)]
    pub session_channels: Vec<usize>,

    /// Sizes of the channels every client owns
    #[serde(rename = "clientChannels", default)]
    pub client_channels: Vec<usize>,
}

impl SessionConfig {
    /// Create a configuration
    pub fn new(
        secret: impl Into<String>,
        session_channels: Vec<usize>,
        client_channels: Vec<usize>,
    ) -> Self {
        Self {
            secret: secret.into(),
            session_channels,
            client_channels,
        }
    }

    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&text)
    }

    /// Parse and validate a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that both channel tables are addressable and writable
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_table("session", &self.session_channels)?;
        check_table("client", &self.client_channels)
    }

    pub(crate) fn session_sizes(&self) -> Arc<[usize]> {
        Arc::from(self.session_channels.as_slice())
    }

    pub(crate) fn client_sizes(&self) -> Arc<[usize]> {
        Arc::from(self.client_channels.as_slice())
    }
}

fn check_table(table: &'static str, sizes: &[usize]) -> Result<(), ConfigError> {
    if sizes.len() > MAX_CHANNELS {
        return Err(ConfigError::TooManyChannels {
            table,
            count: sizes.len(),
        });
    }

    match sizes.iter().position(|&size| size == 0) {
        Some(index) => Err(ConfigError::ZeroSizedChannel { table, index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_session_json() {
        let config = SessionConfig::from_json(
            r#"{"sessionId": "abc-123", "serverChannels": [4, 16], "clientChannels": [2]}"#,
        )
        .unwrap();

        assert_eq!(config.secret, "abc-123");
        assert_eq!(config.session_channels, vec![4, 16]);
        assert_eq!(config.client_channels, vec![2]);
    }

    #[test]
    fn test_missing_tables_default_empty() {
        let config = SessionConfig::from_json(r#"{"sessionId": "x"}"#).unwrap();

        assert!(config.session_channels.is_empty());
        assert!(config.client_channels.is_empty());
    }

    #[test]
    fn test_missing_secret_is_error() {
        let result = SessionConfig::from_json(r#"{"serverChannels": [1]}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_zero_sized_channel_rejected() {
        let result = SessionConfig::from_json(r#"{"sessionId": "x", "clientChannels": [4, 0]}"#);
        assert!(matches!(
            result,
            Err(ConfigError::ZeroSizedChannel {
                table: "client",
                index: 1
            })
        ));
    }

    #[test]
    fn test_too_many_channels_rejected() {
        let config = SessionConfig::new("x", vec![1; MAX_CHANNELS + 1], vec![]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyChannels {
                table: "session",
                count: 129
            })
        ));

        let config = SessionConfig::new("x", vec![1; MAX_CHANNELS], vec![]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sessionId": "from-disk", "serverChannels": [8], "clientChannels": [3, 3]}}"#
        )
        .unwrap();

        let config = SessionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.secret, "from-disk");
        assert_eq!(config.client_channels, vec![3, 3]);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = SessionConfig::from_file(dir.path().join("session.json"));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
