//! HTTP error mapping: domain errors → structured `{error, message}` bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::error::DomainError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Structured error body returned for every failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            format!("{field}: {}", message.into()),
        )
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "service_unavailable",
            message,
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error.to_owned(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Map domain errors onto the HTTP taxonomy. Internal details are logged,
/// never returned.
impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Unauthorized => {
                Self::unauthorized("Missing or invalid credentials")
            }
            DomainError::Forbidden => Self::new(
                StatusCode::FORBIDDEN,
                "forbidden",
                "You do not have permission to perform this action",
            ),
            DomainError::NotFound { entity, id } => Self::new(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{entity} {id} not found"),
            ),
            DomainError::Validation { field, message } => Self::validation(&field, message),
            DomainError::ServiceUnavailable { message } => {
                tracing::error!(error = %message, "Dependency unavailable");
                Self::service_unavailable("A required service is currently unavailable")
            }
            DomainError::Database { message } => {
                tracing::error!(error = %message, "Database error occurred");
                Self::internal()
            }
            DomainError::Internal { message } => {
                tracing::error!(error = %message, "Internal error occurred");
                Self::internal()
            }
        }
    }
}
