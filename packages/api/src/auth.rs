// ABOUTME: Bearer credential extraction for protected endpoints
// ABOUTME: Resolves the Authorization header to the caller's identity through the identity gate

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use tracing::{debug, warn};
use vibespecs_core::Identity;
use vibespecs_security::Credential;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller. Extracting it fails with 401 when the request
/// carries no valid bearer credential.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            debug!(path = %parts.uri.path(), "Missing bearer credential");
            return Err(ApiError::MissingCredential);
        };

        let identity = state
            .auth
            .gate()
            .verify(&Credential::new(token))
            .await
            .map_err(|e| {
                warn!(path = %parts.uri.path(), "Rejected credential: {}", e);
                ApiError::from(e)
            })?;

        Ok(CurrentUser(identity))
    }
}
