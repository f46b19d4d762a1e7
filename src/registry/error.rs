//! Registry error types

use thiserror::Error;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Every slot is occupied
    #[error("client capacity exceeded ({capacity} slots in use)")]
    CapacityExceeded { capacity: usize },
}
