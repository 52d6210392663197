//! # Gateway Errors
//!
//! Every request ends in exactly one of these or a success reply.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Path does not address any resource
    #[error("{0}")]
    MalformedRequest(String),

    /// Second path segment is not a known action
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// Verb not supported at this resource level
    #[error("{0}")]
    UnsupportedMethod(String),

    /// Request body cannot be stored
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Existence check came back negative
    #[error("{0}")]
    NotFound(String),

    /// Resource already exists on a create
    #[error("{0}")]
    Conflict(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// A backing-store call or response serialization failed
    #[error("{0}")]
    Backend(String),

    /// Reserved route with no implementation
    #[error("{0}")]
    NotImplemented(String),
}

impl GatewayError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::UnknownAction(_) => StatusCode::BAD_REQUEST,
            GatewayError::UnsupportedMethod(_) => StatusCode::BAD_REQUEST,
            GatewayError::InvalidBody(_) => StatusCode::BAD_REQUEST,

            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,

            GatewayError::Conflict(_) => StatusCode::CONFLICT,

            GatewayError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::NotImplemented(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedMethod(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<GatewayError> for ErrorResponse {
    fn from(err: GatewayError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
