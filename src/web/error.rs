//! JSON error responses for the admin API.
//!
//! Every failure is rendered as `{"error": {"code", "message", "details"?}}`
//! with the status taken from the code.

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::DigestError;

/// Field name to messages, reported for rejected request bodies.
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Machine-readable failure kind, serialized as `NOT_FOUND` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    /// A request body failed field validation.
    ValidationError,
    /// The request was well formed but cannot be carried out.
    UnprocessableEntity,
    InternalError,
    /// Dooray rejected the call or could not be reached.
    BadGateway,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ValidationError | Self::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadGateway => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

/// Error returned by handlers.
#[derive(Debug, thiserror::Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<FieldErrors>,
}

impl ApiError {
    fn of(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::of(ErrorCode::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::of(ErrorCode::NotFound, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::of(ErrorCode::UnprocessableEntity, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::of(ErrorCode::InternalError, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::of(ErrorCode::BadGateway, message)
    }

    /// Field-level failures under a fixed "Validation failed" message.
    pub fn validation(details: FieldErrors) -> Self {
        Self {
            details: Some(details),
            ..Self::of(ErrorCode::ValidationError, "Validation failed")
        }
    }

    /// Collect `validator` failures per field, falling back to a generic
    /// message for rules declared without one.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .map(|(field, failures)| {
                let messages = failures
                    .iter()
                    .map(|failure| match &failure.message {
                        Some(message) => message.to_string(),
                        None => format!("Invalid value for {}", field),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        Self::validation(details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DigestError> for ApiError {
    fn from(err: DigestError) -> Self {
        match err {
            DigestError::NotFound(_) => ApiError::not_found(err.to_string()),
            DigestError::Validation(msg) => ApiError::unprocessable(msg),
            DigestError::Credential(msg) => ApiError::bad_request(msg),
            DigestError::Publish(msg) => {
                tracing::warn!("Wiki API error: {}", msg);
                ApiError::bad_gateway(msg)
            }
            other => {
                tracing::error!("Internal error: {}", other);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}
