use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use gradebook::application::services::{
    AccessPolicyKind, AssignmentService, SubmissionService, TokenService, UpsertPolicy,
};
use gradebook::bootstrap::build_app_state;
use gradebook::config::Config;
use gradebook::domain::ports::DocumentRepository;
use gradebook::infrastructure::http::middleware::AppState;
use gradebook::infrastructure::http::router::build_router;
use gradebook::infrastructure::persistence::Database;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-access-token-secret";

pub fn test_config(access_policy: AccessPolicyKind, upsert_policy: UpsertPolicy) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        access_token_secret: TEST_SECRET.to_string(),
        production: false,
        allowed_origins: vec!["http://localhost:5173".to_string()],
        access_policy,
        upsert_policy,
        features_seed_path: None,
        otel_exporter_endpoint: None,
        service_name: "gradebook-test".to_string(),
        metrics_port: 0,
    }
}

pub fn test_state(db: &Database, access_policy: AccessPolicyKind) -> AppState {
    build_app_state(db.clone(), &test_config(access_policy, UpsertPolicy::Upsert))
}

pub fn test_app(db: &Database, access_policy: AccessPolicyKind) -> Router {
    let config = test_config(access_policy, UpsertPolicy::Upsert);
    build_router(build_app_state(db.clone(), &config), &config.allowed_origins)
}

pub fn assignment_service(db: &Database, upsert_policy: UpsertPolicy) -> AssignmentService {
    AssignmentService::new(
        Arc::new(db.clone()) as Arc<dyn DocumentRepository>,
        AccessPolicyKind::Open.build(),
        upsert_policy,
    )
}

pub fn submission_service(db: &Database, upsert_policy: UpsertPolicy) -> SubmissionService {
    SubmissionService::new(
        Arc::new(db.clone()) as Arc<dyn DocumentRepository>,
        AccessPolicyKind::Open.build(),
        upsert_policy,
    )
}

/// Session cookie header value for a signed-in user
pub fn session_cookie(email: &str) -> String {
    let mut user = serde_json::Map::new();
    user.insert("email".to_string(), Value::String(email.to_string()));
    let token = TokenService::new(TEST_SECRET)
        .issue(user)
        .expect("Failed to issue test token");
    format!("token={}", token)
}

pub fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Send and expect a 200 JSON response
pub async fn send_ok(app: &Router, request: Request<Body>) -> Value {
    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
