use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use vibespecs_ai::{AIServiceError, AIServiceResult, GenerationRequest, StructuredGeneration};
use vibespecs_api::{create_router, AppState};
use vibespecs_core::test_fixtures::{named_document, sample_document};
use vibespecs_ideate::PrdGenerator;
use vibespecs_security::{AuthService, MemoryUserStorage, SignedSessionGate};
use vibespecs_storage::{MemoryStorage, ProjectManager};

enum Upstream {
    Fixture,
    Garbage,
    Unconfigured,
}

#[async_trait]
impl StructuredGeneration for Upstream {
    async fn generate(&self, _request: GenerationRequest) -> AIServiceResult<String> {
        match self {
            Upstream::Fixture => Ok(serde_json::to_string(&sample_document()).unwrap()),
            Upstream::Garbage => Ok("I'd love to help with that!".to_string()),
            Upstream::Unconfigured => Err(AIServiceError::NoApiKey),
        }
    }
}

fn app_with(upstream: Upstream) -> Router {
    let directory = Arc::new(MemoryUserStorage::new());
    let gate = Arc::new(SignedSessionGate::with_random_secret(
        chrono::Duration::hours(1),
        directory.clone(),
    ));
    let state = AppState::new(
        Arc::new(ProjectManager::new(Arc::new(MemoryStorage::new()))),
        AuthService::new(directory, gate),
        PrdGenerator::new(Arc::new(upstream)),
    );
    create_router(state)
}

fn app() -> Router {
    app_with(Upstream::Fixture)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request(method, uri, token, body))
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": "secret123", "name": "Maker" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create(app: &Router, token: &str, app_name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/projects",
        Some(token),
        Some(json!({ "data": named_document(app_name) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(&app(), Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_register_login_me() {
    let app = app();
    let token = register(&app, "Maker@Example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "maker@example.com");
    assert_eq!(body["data"]["plan"], "free");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "maker@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "maker@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_register_rejects_bad_input_and_duplicates() {
    let app = app();
    register(&app, "maker@example.com").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "maker@example.com", "password": "secret123", "name": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "secret123", "name": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "missing@fields.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_credential() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/api/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_project_crud_and_ownership() {
    let app = app();
    let alice = register(&app, "alice@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    let first = create(&app, &alice, "First").await;
    let second = create(&app, &alice, "Second").await;

    let (status, body) = send(&app, Method::GET, "/api/projects", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);

    let uri = format!("/api/projects/{}", first);
    let (status, _) = send(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::GET, "/api/projects", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&alice),
        Some(json!({ "name": "ignored", "data": named_document("Renamed") })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["id"], first.as_str());

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Project deleted");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_document_rejected() {
    let app = app();
    let token = register(&app, "maker@example.com").await;

    let mut data = serde_json::to_value(sample_document()).unwrap();
    data.as_object_mut().unwrap().remove("features");
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/projects",
        Some(&token),
        Some(json!({ "data": data })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let mut empty_name = sample_document();
    empty_name.app_name = "  ".to_string();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/projects",
        Some(&token),
        Some(json!({ "data": empty_name })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/api/projects", Some(&token), None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_export_returns_markdown_attachment() {
    let app = app();
    let token = register(&app, "maker@example.com").await;
    let id = create(&app, &token, "TaskFlow").await;

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/projects/{}/export", id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/markdown"));
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"taskflow-prd.md\""
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let content = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(content.starts_with("# TaskFlow"));
}

#[tokio::test]
async fn test_generate_statuses() {
    let app = app();
    let token = register(&app, "maker@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate",
        Some(&token),
        Some(json!({ "idea": "a todo app" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["appName"], "TaskFlow");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/generate",
        Some(&token),
        Some(json!({ "idea": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/generate",
        None,
        Some(json!({ "idea": "a todo app" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_generate_upstream_and_configuration_failures() {
    for (upstream, expected) in [
        (Upstream::Garbage, StatusCode::BAD_GATEWAY),
        (Upstream::Unconfigured, StatusCode::SERVICE_UNAVAILABLE),
    ] {
        let app = app_with(upstream);
        let token = register(&app, "maker@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate",
            Some(&token),
            Some(json!({ "idea": "a todo app" })),
        )
        .await;
        assert_eq!(status, expected);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }
}
