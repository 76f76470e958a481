use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

use models::ModelError;
use service::auth::AuthError;
use service::ServiceError;

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct JsonApiError {
    pub status: u16,
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self { status, error, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), error = self.error, message = %self.message, "request failed");
        }
        let body = JsonApiError { status: self.status.as_u16(), error: self.error.to_string(), message: self.message };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::new(StatusCode::BAD_REQUEST, "validation", msg),
            ServiceError::Model(ModelError::Validation(msg)) => ApiError::new(StatusCode::BAD_REQUEST, "validation", msg),
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::ReadOnly(msg) => ApiError::new(StatusCode::CONFLICT, "read_only", msg),
            ServiceError::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, "conflict", msg),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        ServiceError::from(e).into()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let code = e.code();
        match e {
            AuthError::Validation(msg) => ApiError::new(StatusCode::BAD_REQUEST, "validation", msg),
            AuthError::Conflict => ApiError::new(StatusCode::CONFLICT, "conflict", "user already exists"),
            AuthError::NotFound => ApiError::not_found("user not found"),
            AuthError::Unauthorized => ApiError::unauthorized("invalid credentials"),
            AuthError::Forbidden => ApiError::forbidden("insufficient role"),
            other => {
                warn!(code, error = %other, "auth backend failure");
                ApiError::internal(other.to_string())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
