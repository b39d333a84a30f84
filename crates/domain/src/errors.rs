//! Error types used throughout the sync engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Hearth sync operations
///
/// Variants follow the propagation policy of the engine: `Config` and
/// `ReauthRequired` are fatal for the current call, `Transient` is retryable
/// with backoff, `Rejected` is isolated to the event that triggered it.
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization code exchange failed: {0}")]
    AuthExchange(String),

    #[error("Reauthentication required: {0}")]
    ReauthRequired(String),

    #[error("Transient error: {0}")]
    Transient(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SyncError {
    /// Whether retrying the same operation with backoff can succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Whether the credential state must be rebuilt through a new OAuth flow.
    #[must_use]
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::ReauthRequired(_))
    }
}

/// Result type alias for Hearth sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
