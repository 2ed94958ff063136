// ABOUTME: HTTP API layer for VibeSpecs providing REST endpoints and routing
// ABOUTME: Integration layer over the generator, project manager, and auth service

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod auth_handlers;
pub mod error;
pub mod generate_handlers;
pub mod health;
pub mod project_handlers;
pub mod response;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use state::AppState;

/// Creates the auth API router (nested under /api/auth)
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/me", get(auth_handlers::me))
}

/// Creates the projects API router (nested under /api/projects)
pub fn create_projects_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(project_handlers::list_projects).post(project_handlers::create_project),
        )
        .route(
            "/{id}",
            get(project_handlers::get_project)
                .put(project_handlers::update_project)
                .delete(project_handlers::delete_project),
        )
        .route("/{id}/export", get(project_handlers::export_project))
}

/// Full application router, mounted under `/api`.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/generate", post(generate_handlers::generate_document))
        .nest("/auth", create_auth_router())
        .nest("/projects", create_projects_router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
