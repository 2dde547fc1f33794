use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::app::build_app;
use crate::config::AppConfig;
use crate::state::AppState;
use crate::storage::InMemoryTodoStorage;

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_app(AppState::in_memory());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["status"], "healthy");
    assert_eq!(v["app_name"], "TODO API");
    assert_eq!(v["version"], "1.0.0");
}

#[tokio::test]
async fn test_health_reports_configured_name() {
    let mut config = AppConfig::default();
    config.app.name = "Team Todos".to_string();
    config.app.version = "2.3.4".to_string();
    let state = AppState::new(std::sync::Arc::new(InMemoryTodoStorage::new()), config);

    let response = build_app(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["app_name"], "Team Todos");
    assert_eq!(v["version"], "2.3.4");
}

#[tokio::test]
async fn test_security_and_timing_headers() {
    let app = build_app(AppState::in_memory());

    let response = app
        .oneshot(Request::builder().uri("/api/todos").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-xss-protection"], "1; mode=block");
    assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
    assert_eq!(headers["cache-control"], "no-store");

    let elapsed: f64 = headers["x-process-time"].to_str().unwrap().parse().unwrap();
    assert!(elapsed >= 0.0);
}

#[tokio::test]
async fn test_cors_preflight_with_origin_list() {
    let mut config = AppConfig::default();
    config.cors.allow_origins = vec!["http://localhost:5173".to_string()];
    let state = AppState::new(std::sync::Arc::new(InMemoryTodoStorage::new()), config);

    let response = build_app(state)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/todos")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "http://localhost:5173");
    assert_eq!(headers["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn test_static_files_served_outside_debug() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>todo</html>").unwrap();

    let mut config = AppConfig::default();
    config.static_files.dir = dir.path().display().to_string();
    let state = AppState::new(std::sync::Arc::new(InMemoryTodoStorage::new()), config.clone());
    let app = build_app(state);

    // Unknown client-side route falls back to index.html
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/some/page").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"<html>todo</html>");

    // API routes still win
    let response = app
        .oneshot(Request::builder().uri("/api/todos").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Debug mode never serves the frontend
    config.app.debug = true;
    let state = AppState::new(std::sync::Arc::new(InMemoryTodoStorage::new()), config);
    let response = build_app(state)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
