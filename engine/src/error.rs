//! Error types for the back-office engine.

use crate::{FieldError, FieldName, MutationKind, RowId};
use thiserror::Error;

/// Message shown when a remote failure carries no message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// All possible errors from the back-office engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("missing required field: {0}")]
    MissingRequiredField(FieldName),

    #[error("type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: FieldName,
        expected: String,
        got: String,
    },

    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    // Collection errors
    #[error("row not found: {0}")]
    RowNotFound(RowId),

    #[error("row already exists: {0}")]
    RowAlreadyExists(RowId),

    #[error("field is not writable: {0}")]
    FieldNotWritable(FieldName),

    #[error("no rows selected")]
    EmptySelection,

    // Mutation errors
    #[error("a {0} mutation is already in flight")]
    MutationInFlight(MutationKind),

    #[error("remote error: {}", .message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE))]
    Remote { message: Option<String> },

    // Export errors
    #[error("export failed: {0}")]
    Export(String),
}

impl Error {
    /// Build a remote error carrying a server message.
    pub fn remote(message: impl Into<String>) -> Self {
        Error::Remote {
            message: Some(message.into()),
        }
    }

    /// Text suitable for an error notification.
    ///
    /// Remote failures surface the server message when there is one and the
    /// generic fallback otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Error::Remote { message: Some(m) } if !m.trim().is_empty() => m.clone(),
            Error::Remote { .. } => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
