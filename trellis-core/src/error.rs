//! Error types for trellis-core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed resource pointer
    #[error("Invalid pointer: {0}")]
    InvalidPointer(String),

    /// Malformed resource key
    #[error("Invalid resource key: {0}")]
    InvalidResourceKey(String),
}

impl Error {
    /// Create an invalid pointer error
    pub fn invalid_pointer(msg: impl Into<String>) -> Self {
        Error::InvalidPointer(msg.into())
    }

    /// Create an invalid resource key error
    pub fn invalid_resource_key(msg: impl Into<String>) -> Self {
        Error::InvalidResourceKey(msg.into())
    }
}
