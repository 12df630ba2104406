//! Error types for stream plumbing and filter configuration.
//!
//! The filter stages never produce errors of their own while events flow; a
//! source's error channel is generic and passes through untouched. These
//! variants cover construction, configuration, and the channel-backed sinks.

use thiserror::Error;

/// Main error type for stream and filter operations.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Tag set is empty")]
    EmptyTagSet,

    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("Stream is closed")]
    Closed,

    #[error("Stream disconnected")]
    Disconnected,

    #[error("Timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for StreamError {
    fn from(e: serde_json::Error) -> Self {
        StreamError::InvalidConfig(e.to_string())
    }
}

/// Result type for stream and filter operations.
pub type Result<T> = std::result::Result<T, StreamError>;
