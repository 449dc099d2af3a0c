//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected our username
    #[error("{0}")]
    UsernameTaken(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
}
