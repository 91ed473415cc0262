//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use backoffice_engine::Error as EngineError;
use serde::Serialize;
use serde_json::Value;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Engine(e) => match e {
                EngineError::RowNotFound(_) => StatusCode::NOT_FOUND,
                EngineError::RowAlreadyExists(_) | EngineError::MutationInFlight(_) => {
                    StatusCode::CONFLICT
                }
                EngineError::Validation(_)
                | EngineError::MissingRequiredField(_)
                | EngineError::TypeMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                EngineError::Remote { .. } | EngineError::Export(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                EngineError::InvalidPayload(_)
                | EngineError::FieldNotWritable(_)
                | EngineError::EmptySelection => StatusCode::BAD_REQUEST,
            },
        }
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_message, details) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ("Database error".to_string(), None)
            }
            AppError::Engine(EngineError::Validation(errors)) => {
                tracing::debug!(fields = errors.len(), "Validation failed");
                (
                    self.to_string(),
                    serde_json::to_value(errors).ok(),
                )
            }
            AppError::Engine(e) if status.is_server_error() => {
                tracing::error!("Engine error: {:?}", e);
                (e.user_message(), None)
            }
            AppError::Engine(e) => {
                tracing::warn!("Engine error: {:?}", e);
                (e.to_string(), None)
            }
            AppError::BadRequest(msg) => (msg.clone(), None),
            AppError::NotFound(msg) => (format!("Not found: {}", msg), None),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    "Internal server error".to_string(),
                    Some(Value::String(msg.clone())),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
