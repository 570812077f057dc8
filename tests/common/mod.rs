#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sociable::config::{
    Config, DatabaseConfig, JwtConfig, LikesConfig, ObservabilityConfig, ServerConfig,
    SessionConfig,
};
use sociable::{AppState, create_app};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test_secret_key_minimum_32_characters_long";

/// Short stream interval so SSE tests finish quickly.
pub const TEST_STREAM_INTERVAL_MS: u64 = 50;

pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    pool
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            lifetime_seconds: 3600,
        },
        session: SessionConfig::default(),
        likes: LikesConfig {
            stream_interval_ms: TEST_STREAM_INTERVAL_MS,
        },
        observability: ObservabilityConfig::default(),
    }
}

pub fn create_test_app(pool: SqlitePool) -> Router {
    create_app(AppState::new(pool, test_config()))
}

/// Drive one request through the router.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Extract the `social_token=...` pair from a Set-Cookie header, suitable for
/// replay in a Cookie header.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let pair = raw.split(';').next()?.trim();
    pair.starts_with("social_token=").then(|| pair.to_string())
}

/// Register a user and return the session cookie pair.
pub async fn register_user(app: &Router, username: &str) -> String {
    let response = request(
        app,
        "POST",
        "/auth/register",
        Some(json!({
            "fullName": format!("{username} example"),
            "username": username,
            "password": "hunter22",
        })),
        None,
    )
    .await;

    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    session_cookie(&response).expect("register should set the session cookie")
}
