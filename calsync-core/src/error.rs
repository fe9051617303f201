//! Error types for calsync.

use thiserror::Error;

/// Errors that can occur while syncing the feed into the remote store.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch calendar feed: {0}")]
    Fetch(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to list remote events: {0}")]
    RemoteRead(String),

    #[error("Failed to {action}: {status} {body}")]
    RemoteWrite {
        action: String,
        status: String,
        body: String,
    },
}

impl SyncError {
    pub(crate) fn remote_write(action: impl Into<String>, err: reqwest::Error) -> Self {
        SyncError::RemoteWrite {
            action: action.into(),
            status: err
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(no response)".to_string()),
            body: err.to_string(),
        }
    }
}

/// Result type alias for calsync operations.
pub type SyncResult<T> = Result<T, SyncError>;
