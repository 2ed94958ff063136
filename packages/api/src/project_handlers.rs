// ABOUTME: HTTP request handlers for project CRUD and markdown export
// ABOUTME: Every route is scoped to the authenticated owner

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use vibespecs_core::{Document, DocumentValidationError};
use vibespecs_ideate::export_document;
use vibespecs_storage::ProjectError;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::response::{created, ok};
use crate::state::AppState;

/// Create/update body. `name` and `summary` are accepted for compatibility
/// but always re-derived from `data`.
#[derive(Deserialize)]
pub struct ProjectBody {
    pub name: Option<String>,
    pub summary: Option<String>,
    pub data: Value,
}

fn parse_document(data: Value) -> Result<Document, ProjectError> {
    serde_json::from_value(data).map_err(|e| {
        ProjectError::Validation(DocumentValidationError::single("data", e.to_string()))
    })
}

pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<ProjectBody>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = payload?;
    let document = parse_document(body.data)?;
    let project = state.projects.create(&user.id, document).await?;

    info!(project_id = %project.id, owner_id = %user.id, "Created project");
    Ok(created(project))
}

pub async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Response> {
    let projects = state.projects.list(&user.id).await?;
    info!(owner_id = %user.id, "Retrieved {} projects", projects.len());
    Ok(ok(projects))
}

pub async fn get_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    Ok(ok(state.projects.get(&user.id, &id).await?))
}

pub async fn update_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<ProjectBody>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = payload?;
    let document = parse_document(body.data)?;
    let project = state.projects.update(&user.id, &id, document).await?;

    info!(project_id = %id, "Updated project");
    Ok(ok(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    state.projects.delete(&user.id, &id).await?;

    info!(project_id = %id, "Deleted project");
    Ok(ok(json!({ "message": "Project deleted" })))
}

/// Download the project's document as a markdown attachment.
pub async fn export_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let project = state.projects.get(&user.id, &id).await?;
    let export = export_document(&project.data);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                format!("{}; charset=utf-8", export.mime_type),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.content,
    )
        .into_response())
}
