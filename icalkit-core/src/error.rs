//! Error types for icalkit operations.

use thiserror::Error;

/// Errors that can occur while parsing, splitting or merging calendars.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IcalKitError {
    #[error("ICS parse error: {0}")]
    Parse(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for icalkit operations.
pub type IcalKitResult<T> = Result<T, IcalKitError>;
