#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use bugfinder_api::auth::jwt::{generate_access_token, JwtConfig};
use bugfinder_api::config::ServerConfig;
use bugfinder_api::middleware::rate_limit::{AnalysisRateLimiter, RateLimitConfig};
use bugfinder_api::router::build_app_router;
use bugfinder_api::state::AppState;
use bugfinder_core::analysis::{Analyzer, ModelCallError, ModelClient};
use bugfinder_core::types::DbId;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        rate_limit: RateLimitConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// Stub model
// ---------------------------------------------------------------------------

/// A [`ModelClient`] returning a canned reply and recording each prompt.
pub struct StubModelClient {
    reply: Result<String, ModelCallError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubModelClient {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(ModelCallError::new(message)),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ModelClient for StubModelClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

/// A well-formed model reply with one finding.
pub const WELL_FORMED_REPLY: &str = r#"{
    "errors": [
        {"line": 1, "type": "spelling", "message": "'helo' is misspelled", "suggestion": "hello"}
    ],
    "improvedCode": "print('hello')",
    "explanation": "Fixed the greeting."
}"#;

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// A pool that never connects until used; for tests that do not touch the
/// database. Points at a closed port so any accidental use fails fast.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("postgres://postgres@127.0.0.1:1/unused")
        .unwrap()
}

/// Build the full application router with a stub model and the given quota.
pub fn build_app_with(
    pool: PgPool,
    client: Arc<StubModelClient>,
    rate_limit: RateLimitConfig,
) -> Router {
    let config = ServerConfig {
        rate_limit,
        ..test_config()
    };

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        analyzer: Analyzer::new(client),
        rate_limiter: Arc::new(AnalysisRateLimiter::new(rate_limit)),
    };

    build_app_router(state, &config)
}

/// Build the full application router using the given database pool.
///
/// Uses the production router builder so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(
        pool,
        StubModelClient::replying(WELL_FORMED_REPLY),
        RateLimitConfig::default(),
    )
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Mint a valid bearer token for `user_id`.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
