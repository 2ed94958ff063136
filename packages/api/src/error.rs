// ABOUTME: API error type and its HTTP status mapping
// ABOUTME: Every domain error keeps a distinct status; storage internals are never leaked

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use thiserror::Error;
use tracing::error;
use vibespecs_ideate::GenerationError;
use vibespecs_security::AuthError;
use vibespecs_storage::ProjectError;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    MissingCredential,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Project(err) => match err {
                ProjectError::NotFound(_) => StatusCode::NOT_FOUND,
                ProjectError::Forbidden(_) => StatusCode::FORBIDDEN,
                ProjectError::Validation(_) => StatusCode::BAD_REQUEST,
                ProjectError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(err) => match err {
                AuthError::Expired
                | AuthError::Malformed
                | AuthError::UnknownSubject
                | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::DuplicateEmail(_) | AuthError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::PasswordHash(_)
                | AuthError::Storage(_)
                | AuthError::SessionLifetime => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Generation(err) => match err {
                GenerationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                GenerationError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
                GenerationError::Upstream(_) | GenerationError::Validation(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
        }
    }

    /// Message safe to show to API consumers.
    fn public_message(&self) -> String {
        match self {
            ApiError::Project(ProjectError::Storage(_)) => "Storage error".to_string(),
            ApiError::Auth(
                AuthError::PasswordHash(_) | AuthError::Storage(_) | AuthError::SessionLifetime,
            ) => {
                "Internal server error".to_string()
            }
            ApiError::Generation(GenerationError::Configuration(_)) => {
                "Generation is not configured on this server".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, "Request failed: {}", self);
        }

        let body = ApiResponse::<()>::error(self.public_message());
        (status, ResponseJson(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
