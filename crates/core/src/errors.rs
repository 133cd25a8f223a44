//! Core error types for the family wallet ledger.
//!
//! Failures are per operation and never fatal. Validation and remote
//! failures are surfaced to callers; a confirmation that references a record
//! missing from the local store is not an error at all (see
//! [`ApplyOutcome`](crate::ledger::ApplyOutcome)).

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Ledger state unavailable: {0}")]
    StateUnavailable(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Returns true when the failure came from the record service.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote(_))
    }

    /// Returns true when the failure is a rejected input or record.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Malformed input or record fields, rejected before reaching the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Field '{field}' must not be negative (got {value})")]
    NegativeAmount { field: String, value: Decimal },

    #[error("Field '{field}' must be greater than zero (got {value})")]
    NonPositiveAmount { field: String, value: Decimal },

    #[error("Field '{field}' allows at most {scale} decimal places (got {value})")]
    ExcessPrecision {
        field: String,
        value: Decimal,
        scale: u32,
    },

    #[error("Field '{field}' is out of range: {detail}")]
    OutOfRange { field: String, detail: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Failures reported by a record service.
///
/// The display text is the human-readable message shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    #[error("{0}")]
    RequestFailed(String),

    #[error("Record {0} was not found on the server")]
    NotFound(String),

    #[error("Record service unavailable: {0}")]
    Unavailable(String),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
