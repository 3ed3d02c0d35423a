//! Error types for the gateway
//!
//! Provides unified error handling using thiserror. Every variant renders as
//! the standard `{success: false, message, error?}` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::identity::IdentityError;
use crate::models::ApiResponse;
use crate::store::StoreError;

// == Api Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// The request body is not JSON of the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The requested document does not exist
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// The document store failed
    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },

    /// The identity provider failed
    #[error("{context}: {source}")]
    Identity {
        context: String,
        #[source]
        source: IdentityError,
    },
}

impl ApiError {
    /// Wraps a store failure with the message shown to clients.
    pub fn store(context: &str) -> impl FnOnce(StoreError) -> ApiError + '_ {
        move |source| ApiError::Store {
            context: context.to_string(),
            source,
        }
    }

    /// Replaces the client-facing message of an internal failure. Other
    /// variants pass through unchanged.
    pub fn context(self, context: &str) -> Self {
        match self {
            ApiError::Store { source, .. } => ApiError::Store {
                context: context.to_string(),
                source,
            },
            ApiError::Identity { source, .. } => ApiError::Identity {
                context: context.to_string(),
                source,
            },
            other => other,
        }
    }

    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Store { .. } | ApiError::Identity { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(source: StoreError) -> Self {
        ApiError::Store {
            context: "Internal server error".to_string(),
            source,
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(source: IdentityError) -> Self {
        match source {
            IdentityError::InvalidToken(_) => ApiError::Unauthorized("Invalid token".to_string()),
            IdentityError::UserNotFound(_) => ApiError::NotFound("User not found".to_string()),
            source => ApiError::Identity {
                context: "Internal server error".to_string(),
                source,
            },
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg) => ApiResponse::failure(msg, None),
            ApiError::InvalidBody(detail) => {
                ApiResponse::failure("Invalid request body", Some(detail))
            }
            ApiError::Store { context, source } => {
                tracing::error!(error = %source, "{}", context);
                ApiResponse::failure(context, Some(source.to_string()))
            }
            ApiError::Identity { context, source } => {
                tracing::error!(error = %source, "{}", context);
                ApiResponse::failure(context, Some(source.to_string()))
            }
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, ApiError>;
