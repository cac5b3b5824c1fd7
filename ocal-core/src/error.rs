//! Error types for ocal.

use thiserror::Error;

use crate::timezone::UnknownTimezoneError;

/// Errors that can occur in ocal operations.
#[derive(Error, Debug)]
pub enum OcalError {
    #[error(transparent)]
    UnknownTimezone(#[from] UnknownTimezoneError),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Unexpected wire format: {0}")]
    WireFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ocal operations.
pub type OcalResult<T> = Result<T, OcalError>;
