use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Session has expired")]
    Expired,
    #[error("Session credential is malformed or was not issued here")]
    Malformed,
    #[error("Session refers to a user that no longer exists")]
    UnknownSubject,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User already exists: {0}")]
    DuplicateEmail(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error("User storage error: {0}")]
    Storage(String),
    #[error("Session lifetime out of range")]
    SessionLifetime,
}

impl AuthError {
    /// Errors that mean the caller must authenticate again.
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            AuthError::Expired | AuthError::Malformed | AuthError::UnknownSubject
        )
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
