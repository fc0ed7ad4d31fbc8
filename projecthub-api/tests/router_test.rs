/// Router-level tests for the public surface of the API
///
/// These tests exercise the router, middleware stack, and error mapping
/// without a live database: the pool is created lazily and never
/// connected, so only paths that fail before a query runs are covered.
/// Full end-to-end coverage against Postgres lives in the deployment
/// smoke suite.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use projecthub_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig, JwtConfig},
    error::ErrorResponse,
};
use projecthub_shared::auth::jwt::{create_token, Claims, TokenType};
use sqlx::postgres::PgPoolOptions;
use tower::util::ServiceExt;
use uuid::Uuid;

const TEST_SECRET: &str = "router-test-secret-key-at-least-32-bytes";

fn test_app() -> Router {
    let config = Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            // Port 1 is never listening; the lazy pool only fails if a
            // handler actually runs a query.
            url: "postgresql://postgres@127.0.0.1:1/projecthub_test".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(1))
        .connect_lazy(&config.database.url)
        .expect("lazy pool");

    build_router(AppState::new(pool, config))
}

async fn response_error(response: axum::response::Response) -> ErrorResponse {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("error body")
}

#[tokio::test]
async fn protected_route_requires_authorization_header() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/tasks/my-tasks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error = response_error(response).await;
    assert_eq!(error.error, "unauthorized");
}

#[tokio::test]
async fn non_bearer_authorization_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/notifications/unread-count")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = response_error(response).await;
    assert_eq!(error.error, "bad_request");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/teams")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error = response_error(response).await;
    assert_eq!(error.error, "unauthorized");
}

#[tokio::test]
async fn refresh_token_cannot_access_protected_routes() {
    let app = test_app();

    // A validly signed token of the wrong type must not pass the layer.
    let claims = Claims::new(Uuid::new_v4(), TokenType::Refresh);
    let token = create_token(&claims, TEST_SECRET).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/projects")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_wrong_secret_is_rejected() {
    let app = test_app();

    let claims = Claims::new(Uuid::new_v4(), TokenType::Access);
    let token = create_token(&claims, "some-other-secret-that-is-32-bytes-long").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/users/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_returns_not_found() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}
