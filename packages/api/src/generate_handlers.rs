use axum::{extract::rejection::JsonRejection, extract::State, response::Response, Json};
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::response::ok;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub idea: String,
}

/// Turn a free-text idea into a validated document. Nothing is persisted.
pub async fn generate_document(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    info!(user_id = %user.id, "Generating document");

    let document = state
        .generator
        .generate_with_retry(&request.idea, &state.retry)
        .await?;
    Ok(ok(document))
}
