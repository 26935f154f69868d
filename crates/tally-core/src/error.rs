//! Error types and result handling for submission operations.
//!
//! The taxonomy follows the system's boundaries: a payload can be malformed,
//! the row store can fail, and the read API can be asked for an action it
//! does not know. Every variant is caught at the HTTP boundary and rendered
//! as a JSON status body; none propagate as panics.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for ingest and retrieve operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed ingest body, or a row shape the header cannot accept.
    #[error("invalid payload: {0}")]
    Payload(String),

    /// Row store read or write failure.
    #[error("row store error: {0}")]
    Store(String),

    /// Retrieve called with an unrecognized action value.
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(err.to_string())
    }
}
