//! Common error types for voxset

use thiserror::Error;

/// Common result type for voxset operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the voxset tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audio decoding, encoding or processing error
    #[error("Audio error: {0}")]
    Audio(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
