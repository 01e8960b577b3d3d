//! Validation errors raised by the watch configuration
//!
//! Every variant is produced before a value is committed, so a failed setter
//! leaves the configuration exactly as it was.

use thiserror::Error;

/// Errors that can occur while configuring an event watch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WatchError {
    #[error("The event(s) {bad:?} are not supported. The supported events are:\n {supported:?}")]
    InvalidEventName {
        bad: Vec<String>,
        supported: Vec<String>,
    },

    #[error("The coordinates {value:?} are not supported. The supported coordinates are:\n {allowed:?}")]
    InvalidCoordinateSystem {
        value: String,
        allowed: Vec<String>,
    },

    #[error("wait must be set to a non-negative integer. Got {0}")]
    InvalidWaitValue(i64),

    #[error("wait must be at most {max} milliseconds. Got {0}", max = i64::MAX)]
    WaitOutOfRange(u64),

    #[error("The event rate limiting method {value:?} is not supported. The supported methods are:\n {allowed:?}")]
    InvalidRateLimitMethod {
        value: String,
        allowed: Vec<String>,
    },

    #[error("The '{field}' field expected {expected}, not {found}")]
    InvalidType {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Result type for watch configuration operations
pub type WatchResult<T> = Result<T, WatchError>;
