// ABOUTME: HTTP request handlers for registration, login, and the current identity
// ABOUTME: Register and login return the identity together with a fresh session credential

use axum::{extract::rejection::JsonRejection, extract::State, response::Response, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use vibespecs_core::Identity;
use vibespecs_security::Credential;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::response::{created, ok};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthPayload {
    pub user: Identity,
    pub token: Credential,
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let (user, token) = state
        .auth
        .register(&request.email, &request.password, &request.name)
        .await?;

    info!(user_id = %user.id, "Registered user");
    Ok(created(AuthPayload { user, token }))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let (user, token) = state.auth.login(&request.email, &request.password).await?;

    info!(user_id = %user.id, "User logged in");
    Ok(ok(AuthPayload { user, token }))
}

pub async fn me(CurrentUser(identity): CurrentUser) -> ApiResult<Response> {
    Ok(ok(identity))
}
