//! Error types for zvec
//!
//! This module defines the status code table shared with C callers and the
//! error enum every engine operation returns.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for zvec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric status codes surfaced across the C boundary.
///
/// Values are part of the ABI and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    /// Operation completed successfully
    Ok = 0,
    /// Unknown error
    Unknown = 1,
    /// Invalid argument provided
    InvalidArgument = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Internal error
    InternalError = 5,
    /// I/O error
    IoError = 6,
    /// Schema validation failed
    InvalidSchema = 7,
    /// Index operation failed
    IndexError = 8,
}

impl StatusCode {
    /// Integer value used on the wire
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Decode from the integer value used on the wire
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(StatusCode::Ok),
            1 => Some(StatusCode::Unknown),
            2 => Some(StatusCode::InvalidArgument),
            3 => Some(StatusCode::NotFound),
            4 => Some(StatusCode::AlreadyExists),
            5 => Some(StatusCode::InternalError),
            6 => Some(StatusCode::IoError),
            7 => Some(StatusCode::InvalidSchema),
            8 => Some(StatusCode::IndexError),
            _ => None,
        }
    }

    /// Check if this code means success
    pub fn is_ok(self) -> bool {
        self == StatusCode::Ok
    }
}

/// Error types for zvec operations
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied an argument the operation cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Collection, document, field, or index does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Collection, document, or field already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Schema or document does not satisfy the schema rules
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Index creation or removal failed
    #[error("Index error: {0}")]
    IndexError(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (bug or invariant violation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an InvalidArgument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a NotFound error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an AlreadyExists error
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Error::AlreadyExists(msg.into())
    }

    /// Create an InvalidSchema error
    pub fn invalid_schema(msg: impl Into<String>) -> Self {
        Error::InvalidSchema(msg.into())
    }

    /// Create an Internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Status code reported to C callers for this error
    pub fn code(&self) -> StatusCode {
        match self {
            Error::InvalidArgument(_) => StatusCode::InvalidArgument,
            Error::NotFound(_) => StatusCode::NotFound,
            Error::AlreadyExists(_) => StatusCode::AlreadyExists,
            Error::InvalidSchema(_) => StatusCode::InvalidSchema,
            Error::IndexError(_) => StatusCode::IndexError,
            Error::Io(_) => StatusCode::IoError,
            Error::Serialization(_) => StatusCode::InternalError,
            Error::Internal(_) => StatusCode::InternalError,
        }
    }

    /// Check if this error indicates a missing entity
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
