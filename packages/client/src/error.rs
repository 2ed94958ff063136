// ABOUTME: Client-side error type and failure classification
// ABOUTME: Every backend error keeps its kind alongside a single user-facing message

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vibespecs_ideate::GenerationError;
use vibespecs_security::AuthError;
use vibespecs_storage::ProjectError;

/// What went wrong, independent of which backend reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Configuration,
    Upstream,
    Validation,
    InvalidInput,
    NotFound,
    Forbidden,
    Unauthorized,
    Storage,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("A generation is already in progress")]
    GenerationInProgress,

    #[error("{0}")]
    InvalidState(String),

    #[error("{message}")]
    Service { kind: FailureKind, message: String },
}

impl ClientError {
    pub fn service(kind: FailureKind, message: impl Into<String>) -> Self {
        ClientError::Service {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::GenerationInProgress | ClientError::InvalidState(_) => {
                FailureKind::InvalidInput
            }
            ClientError::Service { kind, .. } => *kind,
        }
    }
}

impl From<GenerationError> for ClientError {
    fn from(err: GenerationError) -> Self {
        let kind = match &err {
            GenerationError::Configuration(_) => FailureKind::Configuration,
            GenerationError::Upstream(_) => FailureKind::Upstream,
            GenerationError::Validation(_) => FailureKind::Validation,
            GenerationError::InvalidInput(_) => FailureKind::InvalidInput,
        };
        ClientError::service(kind, err.to_string())
    }
}

impl From<ProjectError> for ClientError {
    fn from(err: ProjectError) -> Self {
        let kind = match &err {
            ProjectError::NotFound(_) => FailureKind::NotFound,
            ProjectError::Forbidden(_) => FailureKind::Forbidden,
            ProjectError::Validation(_) => FailureKind::Validation,
            ProjectError::Storage(_) => FailureKind::Storage,
        };
        ClientError::service(kind, err.to_string())
    }
}

impl From<AuthError> for ClientError {
    fn from(err: AuthError) -> Self {
        let kind = match &err {
            AuthError::Expired
            | AuthError::Malformed
            | AuthError::UnknownSubject
            | AuthError::InvalidCredentials => FailureKind::Unauthorized,
            AuthError::DuplicateEmail(_) | AuthError::InvalidInput(_) => FailureKind::InvalidInput,
            AuthError::PasswordHash(_) | AuthError::Storage(_) => FailureKind::Storage,
            AuthError::SessionLifetime => FailureKind::Configuration,
        };
        ClientError::service(kind, err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
