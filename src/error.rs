//! Crate-level errors for the relay

use crate::watch::error::WatchError;
use thiserror::Error;

/// Errors that can occur while relaying events to the host
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Watch configuration error: {0}")]
    Watch(#[from] WatchError),

    /// A registered callback failed; delivery to later callbacks was skipped.
    #[error("Callback error: {0}")]
    Callback(anyhow::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
